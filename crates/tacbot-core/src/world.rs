use crate::AgentId;

/// Read-only world access.
///
/// The kernel does not prescribe which queries a world exposes; the shooter crate defines
/// extension traits for actors, traces, navigation and weapons.
pub trait WorldView {
    type Actor: AgentId;
}

/// Command sink: the host systems a bot may issue orders to.
pub trait WorldMut: WorldView {}
