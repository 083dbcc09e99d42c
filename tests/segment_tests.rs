//! Integration tests for segment lifecycle
//!
//! These exercise real POSIX shared memory objects; names are unique per
//! process and test so parallel runs do not collide.

use seurat::{segment, Segment, SeuratError};

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_name(suffix: &str) -> String {
        format!("seurat_test_{}_{}", std::process::id(), suffix)
    }

    #[test]
    fn test_create_and_close_release() {
        let name = unique_name("create_close");
        let mut seg = Segment::create_or_replace(&name, 128).unwrap();
        assert!(seg.owns_lifecycle());
        assert_eq!(seg.size(), 128);
        assert_eq!(seg.name(), format!("/{}", name));
        assert!(!seg.is_closed());

        seg.close(true).unwrap();
        assert!(seg.is_closed());

        // the name is free again
        assert!(matches!(
            Segment::attach(&name).unwrap_err(),
            SeuratError::SegmentNotFound { .. }
        ));
    }

    #[test]
    fn test_attach_missing_fails_without_creating() {
        let name = unique_name("missing");
        assert!(matches!(
            Segment::attach(&name).unwrap_err(),
            SeuratError::SegmentNotFound { .. }
        ));
        // a failed attach must not have created the object
        assert!(matches!(
            Segment::attach(&name).unwrap_err(),
            SeuratError::SegmentNotFound { .. }
        ));
    }

    #[test]
    fn test_new_segment_is_zero_filled() {
        let name = unique_name("zeroed");
        let mut seg = Segment::create_or_replace(&name, 256).unwrap();
        assert!(seg.as_slice().unwrap().iter().all(|&b| b == 0));
        seg.close(true).unwrap();
    }

    #[test]
    fn test_replace_discards_previous_contents() {
        let name = unique_name("replace");

        let mut first = Segment::create_or_replace(&name, 64).unwrap();
        first.as_mut_slice().unwrap().fill(0xAB);
        // detach without releasing so the object (and its contents) survive
        first.close(false).unwrap();

        {
            let attached = Segment::attach(&name).unwrap();
            assert!(attached.as_slice().unwrap().iter().all(|&b| b == 0xAB));
        }

        // destructive takeover: fresh object, fresh zeros
        let mut second = Segment::create_or_replace(&name, 64).unwrap();
        assert!(second.as_slice().unwrap().iter().all(|&b| b == 0));
        second.close(true).unwrap();
    }

    #[test]
    fn test_attacher_does_not_own_lifecycle() {
        let name = unique_name("nonowner");
        let mut owner = Segment::create_or_replace(&name, 64).unwrap();

        let mut attacher = Segment::attach(&name).unwrap();
        assert!(!attacher.owns_lifecycle());
        assert_eq!(attacher.size(), 64);

        // a non-owning close(release=true) must not unlink the object
        attacher.close(true).unwrap();
        let mut again = Segment::attach(&name).unwrap();
        again.close(false).unwrap();

        owner.close(true).unwrap();
    }

    #[test]
    fn test_close_is_idempotent() {
        let name = unique_name("idempotent");
        let mut seg = Segment::create_or_replace(&name, 32).unwrap();
        seg.close(true).unwrap();
        seg.close(true).unwrap();
        seg.close(false).unwrap();
    }

    #[test]
    fn test_buffer_access_after_close_fails() {
        let name = unique_name("closed_access");
        let mut seg = Segment::create_or_replace(&name, 32).unwrap();
        seg.close(true).unwrap();
        assert!(seg.as_slice().is_err());
        assert!(seg.as_mut_slice().is_err());
    }

    #[test]
    fn test_drop_without_close_leaves_object() {
        let name = unique_name("dropped");
        {
            let _seg = Segment::create_or_replace(&name, 32).unwrap();
            // dropped here without close(); only the mapping detaches
        }
        let mut seg = Segment::attach(&name).unwrap();
        assert_eq!(seg.size(), 32);
        seg.close(false).unwrap();
        segment::unlink(&name).unwrap();
    }

    #[test]
    fn test_unlink_missing_fails() {
        assert!(matches!(
            segment::unlink(&unique_name("unlink_missing")).unwrap_err(),
            SeuratError::SegmentNotFound { .. }
        ));
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(Segment::create_or_replace("", 32).is_err());
        assert!(Segment::create_or_replace("a/b", 32).is_err());
        assert!(Segment::create_or_replace(&unique_name("zero"), 0).is_err());
    }
}
