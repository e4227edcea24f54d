//! Process-wide library handle. Kept in its own test binary because the
//! handle can be initialised only once per process.

mod common;

use nklib_materials::{init, library, LayerRequest, Material, MaterialError};

#[test]
fn test_global_library_lifecycle() {
    assert!(matches!(library(), Err(MaterialError::NotInitialised)));

    // A failed init leaves the handle unset
    let empty = tempfile::tempdir().unwrap();
    assert!(init(empty.path()).is_err());
    assert!(matches!(library(), Err(MaterialError::NotInitialised)));

    let dir = common::library_dir();
    let lib = init(dir.path()).unwrap();
    assert_eq!(lib.data_dir(), dir.path());

    let layer = library()
        .unwrap()
        .build_layer(Material::Ito, &LayerRequest::new(200.0))
        .unwrap();
    assert_eq!(layer.len(), 459);

    match init(dir.path()) {
        Err(MaterialError::AlreadyInitialised(path)) => assert_eq!(path, dir.path()),
        other => panic!("expected AlreadyInitialised, got {:?}", other.map(|_| ())),
    }
}
