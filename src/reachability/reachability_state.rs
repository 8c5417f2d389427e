use biodivine_lib_bdd::Bdd;

/// The states discovered so far, together with the most recent layer.
///
/// Only the `frontier` is expanded in the next iteration; every state outside of it already
/// had its image added to `set`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ReachabilityState {
    pub iteration: usize,
    pub set: Bdd,
    pub frontier: Bdd,
}

impl From<Bdd> for ReachabilityState {
    fn from(value: Bdd) -> Self {
        ReachabilityState {
            iteration: 0,
            frontier: value.clone(),
            set: value,
        }
    }
}

impl From<&Bdd> for ReachabilityState {
    fn from(value: &Bdd) -> Self {
        Self::from(value.clone())
    }
}

impl From<ReachabilityState> for Bdd {
    fn from(value: ReachabilityState) -> Self {
        value.set
    }
}
