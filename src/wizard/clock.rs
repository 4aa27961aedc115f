use chrono::{Duration, Local, NaiveDateTime};
use std::sync::Mutex;

/// Reloj de pared usado para generar IDs y la fecha de la sesión.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Reloj manual para pruebas y demostraciones reproducibles.
pub struct FixedClock {
    current: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(start: NaiveDateTime) -> Self {
        FixedClock {
            current: Mutex::new(start),
        }
    }

    pub fn advance(&self, seconds: i64) {
        if let Ok(mut current) = self.current.lock() {
            *current += Duration::seconds(seconds);
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.current.lock() {
            Ok(current) => *current,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
