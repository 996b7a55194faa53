// Unit tests for file-selection validation
//
// The validator checks the declared media-type class and emptiness; it never
// constructs an artifact for a rejected file and never mutates anything.

use neuroscreen::{validate, ArtifactKind, SelectedFile, ValidateError};

fn file(name: &str, media_type: &str, bytes: Vec<u8>) -> SelectedFile {
    SelectedFile {
        name: name.to_string(),
        media_type: media_type.to_string(),
        bytes,
    }
}

#[test]
fn test_rejects_wrong_media_class_for_audio() {
    let result = validate(file("spiral.png", "image/png", vec![1, 2, 3]), ArtifactKind::Audio);

    assert_eq!(
        result.unwrap_err(),
        ValidateError::InvalidType {
            found: "image/png".to_string(),
            expected: "audio",
        }
    );
}

#[test]
fn test_rejects_wrong_media_class_for_image() {
    let result = validate(file("voice.wav", "audio/wav", vec![1, 2, 3]), ArtifactKind::Image);

    assert!(matches!(result, Err(ValidateError::InvalidType { .. })));
}

#[test]
fn test_rejects_unrelated_media_types() {
    for media_type in ["text/plain", "application/pdf", "video/mp4", ""] {
        let result = validate(file("f", media_type, vec![0u8; 16]), ArtifactKind::Audio);
        assert!(
            matches!(result, Err(ValidateError::InvalidType { .. })),
            "{} should be rejected",
            media_type
        );
    }
}

#[test]
fn test_prefix_must_match_at_start() {
    // "x-audio/wav" contains but does not start with the class prefix
    let result = validate(file("f", "x-audio/wav", vec![1]), ArtifactKind::Audio);
    assert!(matches!(result, Err(ValidateError::InvalidType { .. })));
}

#[test]
fn test_rejects_empty_file() {
    let result = validate(file("silent.wav", "audio/wav", Vec::new()), ArtifactKind::Audio);
    assert_eq!(result.unwrap_err(), ValidateError::EmptyFile);
}

#[test]
fn test_accepts_audio_and_preserves_payload() {
    let bytes = vec![7u8; 1234];
    let artifact = validate(
        file("voice.mp3", "audio/mpeg", bytes.clone()),
        ArtifactKind::Audio,
    )
    .expect("valid audio file");

    assert_eq!(artifact.kind, ArtifactKind::Audio);
    assert_eq!(artifact.bytes.len(), bytes.len());
    assert_eq!(artifact.bytes, bytes);
    assert_eq!(artifact.media_type, "audio/mpeg");
    assert_eq!(artifact.file_name.as_deref(), Some("voice.mp3"));
}

#[test]
fn test_accepts_image() {
    let artifact = validate(
        file("spiral.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF]),
        ArtifactKind::Image,
    )
    .expect("valid image file");

    assert_eq!(artifact.kind, ArtifactKind::Image);
    assert_eq!(artifact.bytes.len(), 3);
}

#[test]
fn test_validation_is_idempotent() {
    // Same input accepted twice yields the same artifact
    let a = validate(file("v.wav", "audio/wav", vec![1, 2]), ArtifactKind::Audio).unwrap();
    let b = validate(file("v.wav", "audio/wav", vec![1, 2]), ArtifactKind::Audio).unwrap();

    assert_eq!(a.bytes, b.bytes);
    assert_eq!(a.media_type, b.media_type);
    assert_eq!(a.file_name, b.file_name);
}

#[test]
fn test_recording_artifact_has_no_file_name() {
    let artifact = neuroscreen::Artifact::from_recording(vec![1, 2, 3]);

    assert_eq!(artifact.kind, ArtifactKind::Audio);
    assert_eq!(artifact.media_type, "audio/wav");
    assert!(artifact.file_name.is_none());
}
