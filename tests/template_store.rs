mod common;

use std::fs::{self, File};

use ndarray::Array2;
use ndarray_npy::NpzWriter;
use tempfile::tempdir;

use common::{descriptor, hand, FIST, OPEN_PALM};
use handgesture::descriptor::Descriptor;
use handgesture::error::GestureError;
use handgesture::matcher::GestureMatcher;
use handgesture::templates::{Template, TemplateLibrary};

fn landmark_array(shape: &[(u32, u32); 21]) -> Array2<f64> {
    let mut array = Array2::zeros((21, 2));
    for (i, &(x, y)) in shape.iter().enumerate() {
        array[[i, 0]] = x as f64;
        array[[i, 1]] = y as f64;
    }
    array
}

#[test]
fn test_save_and_load_keep_order() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("gestures.npz");

    // deliberately not alphabetical
    let library = TemplateLibrary::new(vec![
        Template::new("wave", descriptor(&OPEN_PALM)),
        Template::new("fist", descriptor(&FIST)),
        Template::new("open_palm", descriptor(&OPEN_PALM)),
    ])
    .unwrap();
    library.save(&path).unwrap();

    let loaded = TemplateLibrary::load(&path).unwrap();
    assert_eq!(loaded.names(), vec!["wave", "fist", "open_palm"]);
    assert_eq!(loaded.templates()[1].descriptor(), &descriptor(&FIST));

    // "wave" and "open_palm" tie; the stored order still decides
    let found = GestureMatcher::default().find_gesture(&descriptor(&OPEN_PALM), &loaded);
    assert_eq!(found.best_name(), "wave");
}

#[test]
fn test_load_builds_descriptors_from_landmarks() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("raw.npz");

    let mut npz = NpzWriter::new(File::create(&path).unwrap());
    npz.add_array("fist", &landmark_array(&FIST)).unwrap();
    npz.add_array("open_palm", descriptor(&OPEN_PALM).as_array())
        .unwrap();
    npz.finish().unwrap();

    let loaded = TemplateLibrary::load(&path).unwrap();
    assert_eq!(loaded.names(), vec!["fist", "open_palm"]);
    assert_eq!(
        loaded.templates()[0].descriptor(),
        &Descriptor::from_hand(&hand(&FIST)).unwrap()
    );
}

#[test]
fn test_empty_store_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("empty.npz");

    NpzWriter::new(File::create(&path).unwrap()).finish().unwrap();

    let err = TemplateLibrary::load(&path).unwrap_err();
    assert!(matches!(err, GestureError::EmptyLibrary(_)));
}

#[test]
fn test_missing_store_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let err = TemplateLibrary::load(dir.path().join("nope.npz")).unwrap_err();

    assert!(matches!(err, GestureError::TemplateStore { .. }));
}

#[test]
fn test_garbage_store_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("garbage.npz");
    fs::write(&path, b"definitely not a zip archive").unwrap();

    let err = TemplateLibrary::load(&path).unwrap_err();
    assert!(matches!(err, GestureError::TemplateStore { .. }));
}

#[test]
fn test_malformed_entry_fails_whole_load() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("mixed.npz");

    let mut npz = NpzWriter::new(File::create(&path).unwrap());
    npz.add_array("fist", &landmark_array(&FIST)).unwrap();
    npz.add_array("broken", &Array2::<f64>::zeros((4, 4))).unwrap();
    npz.finish().unwrap();

    let err = TemplateLibrary::load(&path).unwrap_err();
    assert!(matches!(err, GestureError::InvalidTemplate { ref name, .. } if name == "broken"));
}

#[test]
fn test_wrong_element_type_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("f32.npz");

    let mut npz = NpzWriter::new(File::create(&path).unwrap());
    npz.add_array("fist", &Array2::<f32>::zeros((21, 21))).unwrap();
    npz.finish().unwrap();

    let err = TemplateLibrary::load(&path).unwrap_err();
    assert!(matches!(err, GestureError::InvalidTemplate { .. }));
}

#[test]
fn test_duplicate_names_cannot_be_saved() {
    let dir = tempdir().expect("tempdir");
    let library = TemplateLibrary::new(vec![
        Template::new("fist", descriptor(&FIST)),
        Template::new("fist", descriptor(&OPEN_PALM)),
    ])
    .unwrap();

    let err = library.save(dir.path().join("dup.npz")).unwrap_err();
    assert!(matches!(err, GestureError::InvalidTemplate { .. }));
}
