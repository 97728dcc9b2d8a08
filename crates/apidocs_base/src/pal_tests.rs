/* 📖 # PAL behaviour shared by MockPal and RealPal

The loader and the CLI only see `PalHandle`, so both implementations must agree on the
observable behaviour of the file operations.
*/

#[cfg(test)]
mod pal_trait_tests {
    use crate::pal::{FilePath, MockPal, Pal, PalHandle, RealPal};
    use std::fs;
    use tempfile::TempDir;

    fn assert_reads_documentation_file(pal: &PalHandle) {
        let path = FilePath::from("docs/default.json");
        assert!(pal.file_exists(&path).unwrap());
        assert_eq!(
            pal.read_file_to_string(&path).unwrap(),
            "{\"groupName\":\"default\"}"
        );
        assert!(!pal.file_exists(&FilePath::from("docs/other.json")).unwrap());
        assert!(pal.read_file(&FilePath::from("docs/other.json")).is_err());
    }

    #[test]
    fn test_mock_pal_through_handle() {
        let mock = MockPal::new();
        mock.add_file(
            FilePath::from("docs/default.json"),
            b"{\"groupName\":\"default\"}".to_vec(),
        );
        assert_reads_documentation_file(&PalHandle::new(mock));
    }

    #[test]
    fn test_real_pal_through_handle() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("docs")).unwrap();
        fs::write(
            temp_dir.path().join("docs/default.json"),
            "{\"groupName\":\"default\"}",
        )
        .unwrap();
        assert_reads_documentation_file(&PalHandle::new(RealPal::new(
            temp_dir.path().to_path_buf(),
        )));
    }

    #[test]
    fn test_read_file_to_string_invalid_utf8() {
        let mock = MockPal::new();
        mock.add_file(FilePath::from("bad.json"), vec![0xFF, 0xFE]);

        let err = mock
            .read_file_to_string(&FilePath::from("bad.json"))
            .unwrap_err();
        assert_eq!(err.to_string(), "File is not valid UTF-8: bad.json");
    }

    #[test]
    fn test_pal_handle_clone_shares_state() {
        let mock = MockPal::new();
        let handle = PalHandle::new(mock.clone());
        let clone = handle.clone();
        mock.add_file(FilePath::from("late.toml"), b"".to_vec());
        assert!(clone.file_exists(&FilePath::from("late.toml")).unwrap());
    }
}
