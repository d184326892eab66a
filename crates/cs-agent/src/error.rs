use cs_core::{AgentId, WaypointId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {agent} routes through unknown waypoint {waypoint}")]
    UnknownWaypoint {
        agent:    AgentId,
        waypoint: WaypointId,
    },

    #[error("{0} agents do not fit in a u32 id space")]
    TooManyAgents(usize),

    #[error("scenario error: {0}")]
    Scenario(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
