fn main() {
    println!("Run `cargo test -p batch-compat` to execute end-to-end batch scenarios.");
}

#[cfg(test)]
mod tests {
    //! End-to-end batch scenarios over the real authorizer and
    //! sanitizer, with an in-memory destination store standing in for
    //! the network.

    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use blobcast_core::{
        Destination, LocalFile, StoredBlobDescriptor, UPLOAD_ACTION, UploadAuthorization,
    };
    use blobcast_remote::{HmacAuthorizer, file_digest, verify};
    use blobcast_sanitize::ExifSanitizer;
    use blobcast_upload::{
        BatchOptions, BatchOrchestrator, BlobCacheNotifier, DestinationSet, Selection, Transport,
        UploadError,
    };
    use chrono::Utc;

    const SECRET: &[u8] = b"batch-compat-secret";

    /// In-memory destination store. Verifies every presented token
    /// against the shared secret before accepting the blob.
    struct InMemoryStore {
        blobs: Mutex<HashMap<String, Vec<(String, u64)>>>, // base_url -> (digest, size)
        fail_urls: Vec<String>,
    }

    impl InMemoryStore {
        fn new() -> Self {
            Self {
                blobs: Mutex::new(HashMap::new()),
                fail_urls: Vec::new(),
            }
        }

        fn failing_on(urls: &[&str]) -> Self {
            Self {
                blobs: Mutex::new(HashMap::new()),
                fail_urls: urls.iter().map(|u| u.to_string()).collect(),
            }
        }

        fn stored_at(&self, base_url: &str) -> Vec<(String, u64)> {
            self.blobs
                .lock()
                .unwrap()
                .get(base_url)
                .cloned()
                .unwrap_or_default()
        }
    }

    impl Transport for InMemoryStore {
        fn upload_blob<'a>(
            &'a self,
            base_url: &'a str,
            file: &'a LocalFile,
            auth: &'a UploadAuthorization,
        ) -> Pin<Box<dyn Future<Output = Result<StoredBlobDescriptor, UploadError>> + Send + 'a>>
        {
            Box::pin(async move {
                if self.fail_urls.iter().any(|u| u == base_url) {
                    return Err(UploadError::Transfer(format!(
                        "simulated outage at {base_url}"
                    )));
                }

                // The store only accepts credentials bound to this exact
                // file and action.
                let digest = file_digest(&file.data);
                verify(auth.token(), &digest, UPLOAD_ACTION, SECRET)?;

                let digest_hex = hex::encode(digest);
                self.blobs
                    .lock()
                    .unwrap()
                    .entry(base_url.to_string())
                    .or_default()
                    .push((digest_hex.clone(), file.size()));

                Ok(StoredBlobDescriptor {
                    digest: digest_hex.clone(),
                    size: file.size(),
                    content_type: file.content_type.clone(),
                    created_at: Utc::now(),
                    url: format!("{base_url}/blobs/{digest_hex}"),
                })
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        refreshed: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn refreshed(&self) -> Vec<String> {
            self.refreshed.lock().unwrap().clone()
        }
    }

    impl BlobCacheNotifier for RecordingNotifier {
        fn destination_refreshed(&self, destination: &str) {
            self.refreshed.lock().unwrap().push(destination.to_string());
        }
    }

    fn dest(name: &str) -> Destination {
        Destination {
            name: name.into(),
            base_url: format!("https://{name}.example.com"),
        }
    }

    /// Builds a structurally valid PNG carrying an eXIf chunk.
    fn png_with_exif(exif_payload: &[u8]) -> Vec<u8> {
        let ihdr = [0u8, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0];
        let chunks: [(&[u8; 4], &[u8]); 4] = [
            (b"IHDR", &ihdr),
            (b"eXIf", exif_payload),
            (b"IDAT", &[0u8; 16]),
            (b"IEND", &[]),
        ];

        let mut out = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        for (kind, payload) in chunks {
            out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
            out.extend_from_slice(kind);
            out.extend_from_slice(payload);
            let mut hasher = crc32fast::Hasher::new();
            hasher.update(kind);
            hasher.update(payload);
            out.extend_from_slice(&hasher.finalize().to_be_bytes());
        }
        out
    }

    #[tokio::test]
    async fn two_files_one_enabled_one_disabled_destination() {
        let sanitizer = ExifSanitizer;
        let authorizer = HmacAuthorizer::new(SECRET);
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::default();
        let orch = BatchOrchestrator::new(&sanitizer, &authorizer, &store, &notifier);

        let set = DestinationSet::new(vec![dest("a"), dest("b")]);
        set.set_enabled("b", false);

        let mut selection = Selection::new();
        selection.add([
            LocalFile::new("one.bin", "application/octet-stream", vec![1u8; 100]),
            LocalFile::new("two.bin", "application/octet-stream", vec![2u8; 200]),
        ]);

        let results = orch.run(&mut selection, &set, &BatchOptions::default()).await;

        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert_eq!(results[0].stored.len(), 2);

        let ledger = set.ledger();
        let a = ledger.get("a").unwrap();
        assert_eq!((a.size, a.transferred), (300, 300));
        let b = ledger.get("b").unwrap();
        assert_eq!((b.enabled, b.size, b.transferred), (false, 0, 0));

        assert!(selection.is_empty());
        assert_eq!(store.stored_at("https://a.example.com").len(), 2);
        assert!(store.stored_at("https://b.example.com").is_empty());
        assert_eq!(notifier.refreshed(), ["a"]);
    }

    #[tokio::test]
    async fn failing_destination_still_clears_batch_and_refreshes() {
        let sanitizer = ExifSanitizer;
        let authorizer = HmacAuthorizer::new(SECRET);
        let store = InMemoryStore::failing_on(&["https://solo.example.com"]);
        let notifier = RecordingNotifier::default();
        let orch = BatchOrchestrator::new(&sanitizer, &authorizer, &store, &notifier);

        let set = DestinationSet::new(vec![dest("solo")]);
        let mut selection = Selection::new();
        selection.add([LocalFile::new(
            "only.bin",
            "application/octet-stream",
            vec![0u8; 50],
        )]);

        let results = orch.run(&mut selection, &set, &BatchOptions::default()).await;

        assert_eq!(results.len(), 1);
        assert!(!results[0].success);

        let state = set.ledger().get("solo").unwrap();
        assert_eq!((state.size, state.transferred), (50, 0));
        assert!(selection.is_empty());
        assert_eq!(notifier.refreshed(), ["solo"]);
    }

    #[tokio::test]
    async fn stored_descriptors_carry_verified_digests() {
        let sanitizer = ExifSanitizer;
        let authorizer = HmacAuthorizer::new(SECRET);
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::default();
        let orch = BatchOrchestrator::new(&sanitizer, &authorizer, &store, &notifier);

        let set = DestinationSet::new(vec![dest("a")]);
        let payload = b"stable payload".to_vec();
        let mut selection = Selection::new();
        selection.add([LocalFile::new(
            "stable.bin",
            "application/octet-stream",
            payload.clone(),
        )]);

        let results = orch.run(&mut selection, &set, &BatchOptions::default()).await;

        // The store verified the token before accepting, so reaching
        // here means the credential was bound to this exact payload.
        let stored = &results[0].stored;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].digest, hex::encode(file_digest(&payload)));
        assert_eq!(stored[0].size, 14);
    }

    #[tokio::test]
    async fn metadata_strip_shrinks_ledger_sizing() {
        let sanitizer = ExifSanitizer;
        let authorizer = HmacAuthorizer::new(SECRET);
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::default();
        let orch = BatchOrchestrator::new(&sanitizer, &authorizer, &store, &notifier);

        let set = DestinationSet::new(vec![dest("a")]);
        let png = png_with_exif(&[0xAAu8; 64]);
        let original_size = png.len() as u64;

        let mut selection = Selection::new();
        selection.add([LocalFile::new("shot.png", "image/png", png)]);

        let results = orch.run(&mut selection, &set, &BatchOptions::default()).await;
        assert!(results[0].success);

        // Sizing reflects the post-sanitization bytes.
        let state = set.ledger().get("a").unwrap();
        assert!(state.size < original_size);
        assert_eq!(state.transferred, state.size);

        let stored = store.stored_at("https://a.example.com");
        assert_eq!(stored[0].1, state.size);
    }

    #[tokio::test]
    async fn keep_metadata_uploads_original_bytes() {
        let sanitizer = ExifSanitizer;
        let authorizer = HmacAuthorizer::new(SECRET);
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::default();
        let orch = BatchOrchestrator::new(&sanitizer, &authorizer, &store, &notifier);

        let set = DestinationSet::new(vec![dest("a")]);
        let png = png_with_exif(&[0xAAu8; 64]);
        let original_size = png.len() as u64;

        let mut selection = Selection::new();
        selection.add([LocalFile::new("shot.png", "image/png", png)]);

        let options = BatchOptions {
            strip_metadata: false,
        };
        orch.run(&mut selection, &set, &options).await;

        let state = set.ledger().get("a").unwrap();
        assert_eq!((state.size, state.transferred), (original_size, original_size));
    }

    #[tokio::test]
    async fn membership_change_resets_ledger_between_batches() {
        let sanitizer = ExifSanitizer;
        let authorizer = HmacAuthorizer::new(SECRET);
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::default();
        let orch = BatchOrchestrator::new(&sanitizer, &authorizer, &store, &notifier);

        let mut set = DestinationSet::new(vec![dest("a"), dest("b")]);
        set.set_enabled("b", false);

        let mut selection = Selection::new();
        selection.add([LocalFile::new(
            "one.bin",
            "application/octet-stream",
            vec![0u8; 100],
        )]);
        orch.run(&mut selection, &set, &BatchOptions::default()).await;

        // Adding a destination discards all prior state and toggles.
        set.replace(vec![dest("a"), dest("b"), dest("c")]);
        let ledger = set.ledger();
        for name in ["a", "b", "c"] {
            let state = ledger.get(name).unwrap();
            assert_eq!((state.enabled, state.size, state.transferred), (true, 0, 0));
        }

        // A second identical replace is a no-op in effect.
        let before = ledger.snapshot();
        set.replace(vec![dest("a"), dest("b"), dest("c")]);
        assert_eq!(set.ledger().snapshot(), before);
    }
}
