//! リリース検索キャッシュ
//!
//! 1回の実行の間だけ生存するキャッシュ。実行開始時に生成し、
//! Resolver へ参照で渡し、実行終了時に破棄する。
//! タグの存在確認はキャッシュしない（確認時点のレジストリ状態を反映するため）。

use crate::model::{LookupQuery, ReleaseSet};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct LookupCache {
    entries: Mutex<HashMap<LookupQuery, ReleaseSet>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<LookupQuery, ReleaseSet>> {
        // 保持中に panic しても中身は整合しているのでそのまま使う
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, query: &LookupQuery) -> Option<ReleaseSet> {
        self.lock().get(query).cloned()
    }

    pub fn insert(&self, query: LookupQuery, releases: ReleaseSet) {
        self.lock().insert(query, releases);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
