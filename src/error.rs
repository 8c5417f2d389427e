use cancel_this::Cancelled;
use thiserror::Error;

/// Errors that abort the construction of a symbolic graph.
///
/// The variants fall into three groups:
///  - *Configuration errors* (`UnknownIdentifier`, `UnknownVariable`, `UnknownAutomaton`,
///    `DuplicateAutomaton`, `Arity`) indicate that the caller supplied an inconsistent
///    model or built it in the wrong order.
///  - *Model errors* (`TypeMismatch`, `Evaluation`, `AmbiguousGlobalWrite`,
///    `InvalidAssignment`, `Deadlock`, `ActionBitsInsufficient`, `DomainTooWide`) are
///    attributable to the input model and carry enough context to be fixed by the user.
///  - `Cancelled` is raised when a cooperative cancellation trigger fires, or when
///    the exploration exceeds its configured iteration limit.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("identifier `{0}` is neither a registered variable nor a constant")]
    UnknownIdentifier(String),

    #[error("automaton `{automaton}` refers to undeclared variable `{variable}`")]
    UnknownVariable { automaton: String, variable: String },

    #[error("composition refers to unknown automaton `{0}`")]
    UnknownAutomaton(String),

    #[error("automaton `{0}` appears more than once in the composition")]
    DuplicateAutomaton(String),

    #[error("operator `{operator}` expects {expected} operand(s), but {found} were given")]
    Arity {
        operator: String,
        expected: usize,
        found: usize,
    },

    #[error("operator `{operator}` cannot be applied to ({operands})")]
    TypeMismatch { operator: String, operands: String },

    #[error("expression evaluation failed: {0}")]
    Evaluation(String),

    #[error(
        "transition #{transition} (action `{action}`) writes a global variable that is also \
         written by its synchronization partner; reachable witness: {state}"
    )]
    AmbiguousGlobalWrite {
        transition: usize,
        action: String,
        state: String,
    },

    #[error(
        "transition #{transition} (action `{action}`) can assign an out-of-range value to \
         `{variable}`; reachable witness: {state}"
    )]
    InvalidAssignment {
        transition: usize,
        action: String,
        variable: String,
        state: String,
    },

    #[error(
        "model has {count} reachable deadlock state(s) and deadlock fixing is disabled; \
         witness: {state}"
    )]
    Deadlock { count: f64, state: String },

    #[error(
        "{transitions} transition(s) need {required} action bit(s), but only {available} \
         were reserved"
    )]
    ActionBitsInsufficient {
        available: usize,
        required: usize,
        transitions: usize,
    },

    #[error("variable `{variable}` needs {bits} bits per copy, which is more than supported")]
    DomainTooWide { variable: String, bits: usize },

    #[error("construction cancelled: {0}")]
    Cancelled(Cancelled),
}

pub type BuildResult<T> = Result<T, BuildError>;

impl From<Cancelled> for BuildError {
    fn from(value: Cancelled) -> Self {
        BuildError::Cancelled(value)
    }
}

impl BuildError {
    /// True if the error is attributable to the input model rather than to the caller.
    pub fn is_model_error(&self) -> bool {
        matches!(
            self,
            BuildError::TypeMismatch { .. }
                | BuildError::Evaluation(_)
                | BuildError::AmbiguousGlobalWrite { .. }
                | BuildError::InvalidAssignment { .. }
                | BuildError::Deadlock { .. }
                | BuildError::ActionBitsInsufficient { .. }
                | BuildError::DomainTooWide { .. }
        )
    }
}
