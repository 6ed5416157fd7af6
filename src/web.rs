//! Browser glue: localStorage, `performance.now()` and console logging.
//! WASM 環境でのみコンパイルされる。

use web_sys::wasm_bindgen::JsValue;

use crate::config::EngineConfig;
use crate::error::StorageError;
use crate::ore::Session;
use crate::storage::{KeyValueStore, MemoryStore};
use crate::time::Clock;

/// `window.localStorage` を使うストア。
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    /// localStorage が使えない（プライベートブラウズ等）場合は `Unavailable`。
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

/// DOMException の name で quota 超過を見分ける。
fn storage_error(err: JsValue) -> StorageError {
    let name = js_sys::Reflect::get(&err, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    match name.as_str() {
        "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED" => StorageError::QuotaExceeded,
        "SecurityError" => StorageError::Unavailable,
        _ => StorageError::Backend(format!("{err:?}")),
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(storage_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(storage_error)
    }
}

/// `performance.now()` と `Date.now()` を読む時計。
pub struct BrowserClock {
    performance: Option<web_sys::Performance>,
}

impl BrowserClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|w| w.performance()),
        }
    }
}

impl Default for BrowserClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for BrowserClock {
    fn monotonic_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            // performance が無い環境では壁時計で代用する
            None => js_sys::Date::now(),
        }
    }

    fn unix_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// `log` のレコードをブラウザのコンソールに流す。
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("Ore Idle: {}", record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

/// コンソールロガーを登録する。二回目以降の呼び出しは無視される。
pub fn init_logging(level: log::LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// ブラウザ用のセッションを作る。localStorage が使えなければメモリ上で遊ぶ。
pub fn browser_session(config: EngineConfig) -> Session {
    let store: Box<dyn KeyValueStore> = match LocalStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{e}; progress will not be kept");
            Box::new(MemoryStore::new())
        }
    };
    Session::new(config, store, Box::new(BrowserClock::new()))
}
