use ballot_rs_comments::FileCommentStore;
use ballot_rs_config::BallotConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File store rooted in a temp dir that lives as long as this value.
pub struct ScratchStore {
    pub store: FileCommentStore,
    dir: TempDir,
}

impl ScratchStore {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Config pointing at the same scratch root.
    pub fn config(&self) -> BallotConfig {
        BallotConfig::builder()
            .storage_root(self.root().to_string_lossy())
            .build()
    }

    pub fn option_path(&self, option_id: &str) -> PathBuf {
        self.store.option_path(option_id)
    }
}

pub fn scratch_store() -> ScratchStore {
    let dir = TempDir::new().expect("tempdir");
    let store = FileCommentStore::new(dir.path()).expect("comment store");
    ScratchStore { store, dir }
}
