use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use super::{Clock, WizardStep};
use crate::models::{HeaderContext, HeaderPatch, Identity, LineItem, LineItemData};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("no se puede agregar una solicitud sin número NE")]
    MissingTrackingCode,

    #[error("el número NE no puede cambiar después de crear solicitudes")]
    TrackingCodeLocked,
}

/// Copia estable de la sesión, consumida por exportadores y repositorio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub header: Option<HeaderContext>,
    pub items: Vec<LineItem>,
}

/// Estado del asistente de solicitudes: encabezado, solicitudes y paso actual.
///
/// La máquina no valida transiciones; el llamador revisa
/// [`check_transition`](super::check_transition) antes de avanzar.
pub struct WizardStateMachine {
    owner: Option<Identity>,
    header: Option<HeaderContext>,
    items: Vec<LineItem>,
    step: WizardStep,
    clock: Arc<dyn Clock>,
}

impl WizardStateMachine {
    pub fn new(owner: Option<Identity>, clock: Arc<dyn Clock>) -> Self {
        WizardStateMachine {
            owner,
            header: None,
            items: Vec::new(),
            step: WizardStep::InitialData,
            clock,
        }
    }

    pub fn owner(&self) -> Option<&Identity> {
        self.owner.as_ref()
    }

    pub fn header(&self) -> Option<&HeaderContext> {
        self.header.as_ref()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Mezcla el parche en el encabezado, creándolo con la fecha de hoy si falta.
    pub fn set_header(&mut self, patch: HeaderPatch) -> Result<&HeaderContext, WizardError> {
        if let Some(header) = &self.header {
            if !self.items.is_empty() && patch.changes_tracking_code(&header.tracking_code) {
                tracing::warn!(
                    tracking_code = %header.tracking_code,
                    "Rejected tracking code change with {} existing items",
                    self.items.len()
                );
                return Err(WizardError::TrackingCodeLocked);
            }
        }

        let today = self.clock.now().date();
        let header = self
            .header
            .get_or_insert_with(|| HeaderContext::empty(today));
        header.apply(patch);
        Ok(&*header)
    }

    pub fn advance_to(&mut self, step: WizardStep) {
        tracing::debug!("Wizard step {} -> {}", self.step, step);
        self.step = step;
    }

    /// Regresa un paso. Sin efecto en los pasos sin retroceso.
    pub fn go_back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.advance_to(previous);
        }
        self.step
    }

    /// Desde SUCCESS vuelve a la vista previa de lo guardado.
    pub fn review(&mut self) -> WizardStep {
        if self.step == WizardStep::Success {
            self.advance_to(WizardStep::Preview);
        }
        self.step
    }

    pub fn add_item(&mut self, data: LineItemData) -> Result<&LineItem, WizardError> {
        let tracking_code = match &self.header {
            Some(header) if header.has_tracking_code() => header.tracking_code.clone(),
            _ => {
                tracing::warn!("Ignoring new item: header has no tracking code");
                return Err(WizardError::MissingTrackingCode);
            }
        };

        let id = item_id(&tracking_code, self.clock.now());
        if self.items.iter().any(|item| item.id == id) {
            // Mismo NE y mismo segundo: el ID se repite y el último guardado gana.
            tracing::warn!(item_id = %id, "Duplicate item id generated within the same second");
        }

        self.items.push(LineItem { id, data });
        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    /// Reemplaza la solicitud con el mismo ID. Devuelve `false` si no existe.
    pub fn update_item(&mut self, item: LineItem) -> bool {
        let mut found = false;
        for existing in self.items.iter_mut().filter(|existing| existing.id == item.id) {
            *existing = item.clone();
            found = true;
        }
        if !found {
            tracing::debug!(item_id = %item.id, "Update ignored: item not found");
        }
        found
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn reset(&mut self) {
        self.header = None;
        self.items.clear();
        self.step = WizardStep::InitialData;
    }

    /// Llamado cuando cambia la identidad activa. Si el usuario es otro, la
    /// sesión se limpia antes de adoptarlo.
    pub fn on_owner_changed(&mut self, owner: Option<Identity>) -> bool {
        let current = self.owner.as_ref().map(|identity| identity.id.as_str());
        let incoming = owner.as_ref().map(|identity| identity.id.as_str());
        if current == incoming {
            return false;
        }

        tracing::info!(
            previous = current.unwrap_or("-"),
            next = incoming.unwrap_or("-"),
            "Session owner changed, resetting wizard"
        );
        self.reset();
        self.owner = owner;
        true
    }

    /// Pasa a SUCCESS tras guardar `saved`, solo si la sesión sigue teniendo
    /// el mismo encabezado y las mismas solicitudes.
    pub fn complete_save(&mut self, saved: &WizardSnapshot) -> bool {
        let unchanged = self.header == saved.header
            && self.items.len() == saved.items.len()
            && self
                .items
                .iter()
                .zip(&saved.items)
                .all(|(current, stored)| current.id == stored.id);

        if unchanged {
            self.advance_to(WizardStep::Success);
        } else {
            tracing::warn!(
                items = self.items.len(),
                saved = saved.items.len(),
                "Session changed while saving, staying on {}",
                self.step
            );
        }
        unchanged
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            header: self.header.clone(),
            items: self.items.clone(),
        }
    }
}

/// `{NE}-{yyyyMMdd}-{HHmmss}`
pub fn item_id(tracking_code: &str, now: NaiveDateTime) -> String {
    format!("{}-{}", tracking_code, now.format("%Y%m%d-%H%M%S"))
}
