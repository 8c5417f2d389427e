use crate::component::ComponentParts;
use log::trace;
use std::collections::BTreeMap;

/// Relabel the units of `inner` according to `mapping`. Silent units and unmapped actions
/// keep their label.
pub(super) fn rename(
    mut inner: ComponentParts,
    mapping: &BTreeMap<String, String>,
) -> ComponentParts {
    for unit in inner.transitions.iter_mut() {
        if let Some(renamed) = unit.action.as_ref().and_then(|action| mapping.get(action)) {
            trace!("Renaming action `{}` to `{renamed}`.", unit.label());
            unit.action = Some(renamed.clone());
        }
    }
    inner
}
