//! Ore Idle セーブ/ロードとオフライン進行。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   新フィールドの追加のみの場合はこの値を変えない（旧データを維持できる）。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//! - `SaveConfig::reset_on_version_change` が true の場合は、バージョンが
//!   一致しないセーブを破棄する（デフォルト false）。
//!
//! ## v2 変更点
//! - `auto_sell_disabled` を追加（v1 には無いので全ティア有効として読み込む）
//!
//! per_click / per_second は保存しない。ロード時に所持アップグレードから再計算する。

use serde::{Deserialize, Serialize};

use crate::config::{OfflineConfig, SaveConfig};
use crate::error::{SaveError, StorageError};
use crate::format::{format_duration, format_number};
use crate::storage::KeyValueStore;

use super::logic::{rebuild_rates, record_mined};
use super::prestige::{self, CoreUpgradeKind, PrestigeStatus};
use super::state::{GameState, ResourceId, Stats};
use super::upgrade::UpgradeId;

/// セーブデータのフォーマットバージョン。
pub const SAVE_VERSION: u32 = 2;

/// 互換性を維持できる最小バージョン。
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// シリアライズ用のセーブデータ構造体。
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    /// 保存時刻 (Unix ms)。オフライン進行の計算に使う。
    /// 記録の無いセーブはオフライン進行を付与しない。
    #[serde(default)]
    timestamp: Option<f64>,
    game: GameSave,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct GameSave {
    money: f64,
    core_shards: u64,
    /// 各ティアの所持数。
    resources: Vec<(ResourceId, f64)>,
    /// 解放済みティア（iron は含めない）。
    unlocked: Vec<ResourceId>,
    stats: Stats,
    /// 各アップグレードの所持数。
    upgrades: Vec<(UpgradeId, u32)>,
    /// 各ティアのマイルストーン達成フラグ。
    milestones: Vec<(ResourceId, Vec<bool>)>,
    /// コアアップグレードのレベル。
    core_upgrades: Vec<(CoreUpgradeKind, u32)>,
    total_prestiges: u32,
    prestige_unlocked: bool,
    lifetime_earned_money: f64,

    // v2
    /// オートセルを止めているティア。
    auto_sell_disabled: Vec<ResourceId>,
}

/// ゲーム状態からセーブ用データを抽出する。
fn extract_save(state: &GameState, now_unix_ms: f64) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        timestamp: Some(now_unix_ms),
        game: GameSave {
            money: state.money,
            core_shards: state.core_shards,
            resources: state.resources.iter().map(|r| (r.id, r.count)).collect(),
            unlocked: state.unlocks.unlocked(),
            stats: state.stats.clone(),
            upgrades: state.upgrades.iter().map(|u| (u.id, u.count)).collect(),
            milestones: ResourceId::ALL
                .iter()
                .map(|&id| (id, state.milestones.achieved(id).to_vec()))
                .collect(),
            core_upgrades: state.core_upgrades.iter().map(|u| (u.kind, u.level)).collect(),
            total_prestiges: state.total_prestiges,
            prestige_unlocked: state.prestige == PrestigeStatus::Unlocked,
            lifetime_earned_money: state.lifetime_earned_money,
            auto_sell_disabled: ResourceId::ALL
                .iter()
                .copied()
                .filter(|id| !state.auto_sell_enabled[id.index()])
                .collect(),
        },
    }
}

/// セーブデータから新しいゲーム状態を組み立てる。
/// 値が欠けている・範囲外の場合は初期値のまま、もしくは範囲内に丸める。
fn apply_save(save: &GameSave) -> GameState {
    let mut state = GameState::new();
    state.money = sanitize(save.money);
    state.core_shards = save.core_shards;

    for &(id, count) in &save.resources {
        state.resource_mut(id).count = sanitize(count);
    }
    for &id in &save.unlocked {
        state.unlocks.set_unlocked(id);
    }
    state.stats = sanitize_stats(&save.stats);

    for &(id, count) in &save.upgrades {
        if let Some(idx) = state.upgrade_index(id) {
            state.upgrades[idx].set_count(count);
        }
    }
    rebuild_rates(&mut state);

    for (id, flags) in &save.milestones {
        state.milestones.set_achieved(*id, flags);
    }
    // 保存後に閾値が変わっていても、累計採掘量から再判定する
    for id in ResourceId::ALL {
        let mined = state.stats.mined(id);
        state.milestones.recompute(id, mined);
    }

    for &(kind, level) in &save.core_upgrades {
        if let Some(u) = state.core_upgrades.iter_mut().find(|u| u.kind == kind) {
            u.level = level.min(u.max_level);
        }
    }

    state.total_prestiges = save.total_prestiges;
    state.lifetime_earned_money = sanitize(save.lifetime_earned_money);
    if save.prestige_unlocked {
        state.prestige = PrestigeStatus::Unlocked;
    }
    prestige::refresh_status(&mut state);

    for &id in &save.auto_sell_disabled {
        state.auto_sell_enabled[id.index()] = false;
    }
    state
}

/// 負値や NaN を 0 に丸める。
fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

fn sanitize_stats(stats: &Stats) -> Stats {
    let mut clean = stats.clone();
    for v in clean.mined.iter_mut().chain(clean.sold.iter_mut()) {
        *v = sanitize(*v);
    }
    clean.earned_money = sanitize(clean.earned_money);
    clean.spent_money = sanitize(clean.spent_money);
    clean
}

/// ゲーム状態を JSON にする。
pub fn encode(state: &GameState, now_unix_ms: f64) -> Result<String, SaveError> {
    serde_json::to_string(&extract_save(state, now_unix_ms)).map_err(SaveError::Serialize)
}

/// オフライン中に採掘した1ティア分。
#[derive(Clone, Debug, PartialEq)]
pub struct OfflineGain {
    pub resource: ResourceId,
    pub mined: f64,
    /// オートセルで売った量。
    pub sold: f64,
    pub cash: f64,
}

/// 「おかえりなさい」表示用のオフライン進行結果。
#[derive(Clone, Debug, PartialEq)]
pub struct OfflineReport {
    /// 実際の経過秒数。
    pub elapsed_secs: f64,
    /// 上限で切り詰めた後の秒数。
    pub credited_secs: f64,
    pub gains: Vec<OfflineGain>,
    pub total_cash: f64,
}

impl std::fmt::Display for OfflineReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Welcome back! You were away for {}", format_duration(self.elapsed_secs))?;
        if self.credited_secs < self.elapsed_secs {
            write!(f, " (paid for {})", format_duration(self.credited_secs))?;
        }
        for gain in &self.gains {
            write!(f, "\n  {}: +{}", gain.resource, format_number(gain.mined))?;
            if gain.sold > 0.0 {
                write!(f, " (sold {} for ${})", format_number(gain.sold), format_number(gain.cash))?;
            }
        }
        if self.total_cash > 0.0 {
            write!(f, "\n  Earned ${}", format_number(self.total_cash))?;
        }
        Ok(())
    }
}

/// 不在時間ぶんの自動生産を付与する。
///
/// `min_elapsed_secs` 未満なら何もしない (None)。それ以上なら
/// 効率を掛けた自動生産量を `max_duration_secs` を上限に付与し、
/// オートセルが動いているティアは `auto_sell_fraction` 分を売却する。
pub fn apply_offline_progress(
    state: &mut GameState,
    elapsed_secs: f64,
    config: &OfflineConfig,
) -> Option<OfflineReport> {
    if !elapsed_secs.is_finite() || elapsed_secs < config.min_elapsed_secs {
        return None;
    }
    let credited_secs = elapsed_secs.min(config.max_duration_secs).max(0.0);
    let sell_fraction = config.auto_sell_fraction.clamp(0.0, 1.0);
    let mut report = OfflineReport {
        elapsed_secs,
        credited_secs,
        gains: Vec::new(),
        total_cash: 0.0,
    };

    for id in ResourceId::ALL {
        if !state.is_unlocked(id) {
            continue;
        }
        let mined = state.effective_per_second(id) * config.efficiency * credited_secs;
        if mined <= 0.0 {
            continue;
        }
        state.resource_mut(id).count += mined;
        record_mined(state, id, mined);

        let mut gain = OfflineGain {
            resource: id,
            mined,
            sold: 0.0,
            cash: 0.0,
        };
        if sell_fraction > 0.0 && state.auto_sell_active(id) {
            let sold = mined * sell_fraction;
            let cash = sold * state.effective_sell_price(id);
            let r = state.resource_mut(id);
            r.count = (r.count - sold).max(0.0);
            state.money += cash;
            state.stats.sold[id.index()] += sold;
            state.stats.earned_money += cash;
            gain.sold = sold;
            gain.cash = cash;
            report.total_cash += cash;
        }
        report.gains.push(gain);
    }
    Some(report)
}

/// ロード結果。
#[derive(Debug)]
pub enum LoadOutcome {
    /// 復元した。
    Restored {
        offline: Option<OfflineReport>,
        from_version: u32,
    },
    /// セーブが無い（エラーではない）。
    NoSave,
    /// 壊れている・バージョン不一致のため破棄して新規ゲーム。
    Discarded(SaveError),
}

impl LoadOutcome {
    pub fn restored(&self) -> bool {
        matches!(self, LoadOutcome::Restored { .. })
    }

    pub fn offline_report(&self) -> Option<&OfflineReport> {
        match self {
            LoadOutcome::Restored { offline, .. } => offline.as_ref(),
            _ => None,
        }
    }
}

/// ゲーム状態をストレージに保存する。
/// 失敗しても状態は変えず、エラーを返すだけ。
pub fn save_game(
    state: &GameState,
    store: &mut dyn KeyValueStore,
    config: &SaveConfig,
    now_unix_ms: f64,
) -> Result<(), SaveError> {
    let json = encode(state, now_unix_ms)?;
    store.set(&config.storage_key, &json)?;
    Ok(())
}

/// 使えないセーブを削除する。削除の失敗は記録するだけ。
fn discard(store: &mut dyn KeyValueStore, key: &str, reason: SaveError) -> LoadOutcome {
    log::warn!("discarding save: {reason}");
    if let Err(e) = store.remove(key) {
        log::warn!("failed to remove discarded save: {e}");
    }
    LoadOutcome::Discarded(reason)
}

/// ストレージからゲーム状態を復元し、オフライン進行を付与する。
///
/// ストレージ自体が使えない場合だけ `Err` を返す。パースエラーや
/// 非互換バージョンは `Discarded` として新規ゲーム扱いにし、
/// `state` は変更しない。
pub fn load_game(
    state: &mut GameState,
    store: &mut dyn KeyValueStore,
    save_config: &SaveConfig,
    offline_config: &OfflineConfig,
    now_unix_ms: f64,
) -> Result<LoadOutcome, StorageError> {
    let key = save_config.storage_key.as_str();
    let Some(json) = store.get(key)? else {
        return Ok(LoadOutcome::NoSave);
    };

    let save_data: SaveData = match serde_json::from_str(&json) {
        Ok(d) => d,
        Err(e) => return Ok(discard(store, key, SaveError::Corrupt(e))),
    };

    let incompatible = save_data.version < MIN_COMPATIBLE_VERSION
        || (save_config.reset_on_version_change && save_data.version != SAVE_VERSION);
    if incompatible {
        let reason = SaveError::VersionMismatch {
            found: save_data.version,
            current: SAVE_VERSION,
        };
        return Ok(discard(store, key, reason));
    }
    if save_data.version < SAVE_VERSION {
        log::info!(
            "migrating save (saved={}, current={})",
            save_data.version,
            SAVE_VERSION
        );
    } else if save_data.version > SAVE_VERSION {
        log::warn!(
            "save is from a newer build (saved={}, current={}); unknown fields are ignored",
            save_data.version,
            SAVE_VERSION
        );
    }

    let mut restored = apply_save(&save_data.game);
    let offline = match away_secs(save_data.timestamp, now_unix_ms) {
        Some(elapsed_secs) => apply_offline_progress(&mut restored, elapsed_secs, offline_config),
        None => None,
    };
    if let Some(report) = &offline {
        log::info!("{report}");
    }
    *state = restored;

    Ok(LoadOutcome::Restored {
        offline,
        from_version: save_data.version,
    })
}

/// 保存時刻から現在までの秒数。時刻が無い・0以下・未来の場合は None。
fn away_secs(saved_at_ms: Option<f64>, now_unix_ms: f64) -> Option<f64> {
    let saved_at = saved_at_ms.filter(|t| t.is_finite() && *t > 0.0)?;
    if saved_at > now_unix_ms {
        log::warn!("save timestamp is in the future; skipping offline progress");
        return None;
    }
    Some((now_unix_ms - saved_at) / 1000.0)
}

/// セーブデータを削除する。
pub fn delete_save(store: &mut dyn KeyValueStore, config: &SaveConfig) -> Result<(), StorageError> {
    store.remove(&config.storage_key)
}
