use super::{WizardStateMachine, WizardStep};
use crate::core::ValidationError;

/// Revisa lo que la interfaz exige antes de mover el asistente a `target`.
///
/// Retroceder o volver al inicio nunca se bloquea.
pub fn check_transition(
    machine: &WizardStateMachine,
    target: WizardStep,
) -> Result<(), ValidationError> {
    match target {
        WizardStep::InitialData => Ok(()),
        WizardStep::ProductList => check_header(machine),
        WizardStep::Preview => check_items(machine),
        WizardStep::Success => {
            check_header(machine)?;
            check_items(machine)
        }
    }
}

fn check_header(machine: &WizardStateMachine) -> Result<(), ValidationError> {
    let header = machine
        .header()
        .ok_or_else(|| ValidationError::new("header", "Complete los datos iniciales"))?;

    if !header.has_tracking_code() {
        return Err(ValidationError::new("tracking_code", "El número NE es obligatorio"));
    }
    if header.manager.trim().is_empty() {
        return Err(ValidationError::new("manager", "El nombre del gestor es obligatorio"));
    }
    let recipient_missing = header
        .recipient
        .as_deref()
        .map(|recipient| recipient.trim().is_empty())
        .unwrap_or(true);
    if recipient_missing {
        return Err(ValidationError::new("recipient", "El destinatario es obligatorio"));
    }
    Ok(())
}

fn check_items(machine: &WizardStateMachine) -> Result<(), ValidationError> {
    if machine.items().is_empty() {
        return Err(ValidationError::new(
            "items",
            "Agregue al menos una solicitud antes de continuar",
        ));
    }
    Ok(())
}
