use label_sheet::{DirQrCache, ImageSource, MemoryQrCache, QrCodeEncoder, QrEncoder, QrError, QrSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
struct Counting {
    calls: Arc<AtomicUsize>,
}

impl QrEncoder for Counting {
    fn encode(&self, payload: &str, size_px: u32) -> Result<Vec<u8>, QrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        QrCodeEncoder.encode(payload, size_px)
    }
}

#[test]
fn memory_cache_encodes_each_sku_once() {
    let encoder = Counting::default();
    let cache = MemoryQrCache::with_size(encoder.clone(), 64);

    let first = cache.get_or_create("A-1").unwrap();
    let second = cache.get_or_create("A-1").unwrap();
    assert_eq!(first, second);
    assert_eq!(encoder.calls.load(Ordering::SeqCst), 1);

    cache.get_or_create("B-2").unwrap();
    assert_eq!(encoder.calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn directory_cache_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let encoder = Counting::default();

    let cache = DirQrCache::with_size(dir.path(), encoder.clone(), 64).unwrap();
    let handle = cache.get_or_create("A/1 x").unwrap();
    match &handle.source {
        ImageSource::Path(path) => {
            assert!(path.starts_with(dir.path()));
            assert!(path.is_file());
        }
        other => panic!("expected a file, got {other:?}"),
    }
    assert!(handle.load().is_ok());

    let reopened = DirQrCache::with_size(dir.path(), encoder.clone(), 64).unwrap();
    assert_eq!(reopened.get_or_create("A/1 x").unwrap(), handle);
    assert_eq!(encoder.calls.load(Ordering::SeqCst), 1);

    // nothing but the published image is left behind
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}
