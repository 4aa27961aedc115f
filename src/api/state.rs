use chrono::{Duration, NaiveDateTime};
use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::AppConfig;
use crate::storage::{MemoryRecordStore, RecordRepository, RecordStore, SqliteRecordStore};
use crate::wizard::{Clock, SystemClock, WizardStateMachine};

/// Sesión abierta del asistente con su último acceso.
pub struct WizardSession {
    pub machine: WizardStateMachine,
    pub last_access: NaiveDateTime,
}

impl WizardSession {
    pub fn new(machine: WizardStateMachine, now: NaiveDateTime) -> Self {
        WizardSession {
            machine,
            last_access: now,
        }
    }

    pub fn touch(&mut self, now: NaiveDateTime) {
        self.last_access = now;
    }
}

pub type SessionMap = Arc<RwLock<HashMap<String, WizardSession>>>;

#[derive(Clone)]
pub struct ApiState {
    pub sessions: SessionMap,
    pub repository: Arc<RecordRepository>,
    pub database: Option<Arc<SqliteRecordStore>>,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<Metrics>,
    pub config: Arc<AppConfig>,
}

impl ApiState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let (store, database): (Arc<dyn RecordStore>, Option<Arc<SqliteRecordStore>>) =
            match &config.database_url {
                Some(url) => {
                    let sqlite = Arc::new(SqliteRecordStore::connect(url).await?);
                    tracing::info!("Using SQLite record store");
                    let store: Arc<dyn RecordStore> = sqlite.clone();
                    (store, Some(sqlite))
                }
                None => {
                    tracing::warn!("DATABASE_URL not set, records are kept in memory");
                    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
                    (store, None)
                }
            };

        let mut state = Self::with_store(config, store, Arc::new(SystemClock))?;
        state.database = database;
        Ok(state)
    }

    /// Estado armado sobre un almacén y un reloj dados.
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        Ok(ApiState {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            repository: Arc::new(RecordRepository::new(store)),
            database: None,
            clock,
            metrics: Arc::new(Metrics::new()?),
            config: Arc::new(config),
        })
    }

    /// Descarta las sesiones sin uso por más de `session_idle_minutes`.
    pub async fn evict_idle_sessions(&self) -> usize {
        let cutoff = self.clock.now() - Duration::minutes(i64::from(self.config.session_idle_minutes));
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_access > cutoff);
        let evicted = before - sessions.len();

        self.metrics.open_sessions.set(sessions.len() as i64);
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Idle wizard sessions evicted");
        }
        evicted
    }
}

/// Contadores del servicio, en un registro propio por instancia.
pub struct Metrics {
    pub registry: Registry,
    pub exports: IntCounterVec,
    pub records_saved: IntCounter,
    pub records_failed: IntCounter,
    pub wizard_resets: IntCounter,
    pub open_sessions: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let exports = IntCounterVec::new(
            Opts::new("exports_total", "Reports generated, by format"),
            &["kind"],
        )?;
        let records_saved = IntCounter::new("records_saved_total", "Line items persisted")?;
        let records_failed =
            IntCounter::new("records_failed_total", "Line items that failed to persist")?;
        let wizard_resets = IntCounter::new(
            "wizard_resets_total",
            "Wizard sessions cleared by reset or identity change",
        )?;
        let open_sessions = IntGauge::new("wizard_sessions_open", "Wizard sessions held in memory")?;

        registry.register(Box::new(exports.clone()))?;
        registry.register(Box::new(records_saved.clone()))?;
        registry.register(Box::new(records_failed.clone()))?;
        registry.register(Box::new(wizard_resets.clone()))?;
        registry.register(Box::new(open_sessions.clone()))?;

        Ok(Metrics {
            registry,
            exports,
            records_saved,
            records_failed,
            wizard_resets,
            open_sessions,
        })
    }
}
