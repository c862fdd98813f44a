use super::*;

#[test]
fn precut_ignores_source_bytes() {
    let mut m = PrecutMatte::new(vec![1, 2, 3]);
    assert_eq!(m.remove_background(&[9, 9]).unwrap(), vec![1, 2, 3]);
}

#[test]
fn closures_are_removers() {
    let mut calls = 0;
    let mut f = |src: &[u8]| -> BehindTextResult<Vec<u8>> {
        calls += 1;
        Ok(src.iter().rev().copied().collect())
    };
    assert_eq!(f.remove_background(&[1, 2]).unwrap(), vec![2, 1]);
    drop(f);
    assert_eq!(calls, 1);
}

#[test]
fn command_requires_placeholders() {
    assert!(CommandRemover::new(vec![]).is_err());
    assert!(CommandRemover::new(vec!["rembg".into(), "{input}".into()]).is_err());
    assert!(
        CommandRemover::new(vec![
            "rembg".into(),
            "i".into(),
            "{input}".into(),
            "{output}".into()
        ])
        .is_ok()
    );
}

#[test]
fn missing_program_fails_without_leaving_files() {
    let dir = std::env::temp_dir().join(format!("behindtext_matte_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let mut r = CommandRemover::new(vec![
        "behindtext-no-such-matting-tool".into(),
        "{input}".into(),
        "{output}".into(),
    ])
    .unwrap()
    .with_work_dir(&dir);
    assert!(r.remove_background(b"bytes").is_err());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    let _ = std::fs::remove_dir_all(&dir);
}

#[cfg(unix)]
#[test]
fn copy_command_round_trips_bytes() {
    if Command::new("cp").arg("--version").output().is_err() {
        eprintln!("skipping: cp is unavailable");
        return;
    }
    let mut r =
        CommandRemover::new(vec!["cp".into(), "{input}".into(), "{output}".into()]).unwrap();
    assert_eq!(r.remove_background(b"png-bytes").unwrap(), b"png-bytes".to_vec());
}

#[cfg(unix)]
#[test]
fn failing_command_is_an_upload_error() {
    let mut r = CommandRemover::new(vec![
        "sh".into(),
        "-c".into(),
        "exit 3 # {input} {output}".into(),
    ])
    .unwrap();
    let err = r.remove_background(b"x").unwrap_err();
    assert!(matches!(err, BehindTextError::Upload(_)), "{err}");
}
