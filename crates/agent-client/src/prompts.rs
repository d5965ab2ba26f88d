//! Agent and task definitions for each stage.
//!
//! These are data: the role/goal of the agent running a stage and the task
//! instructions it receives. The stage inputs are appended to the task as a
//! JSON document.

use crate::stage::{AgentRole, Stage, StageInputs};
use crate::Result;
use serde::Serialize;

/// Who runs a stage
#[derive(Debug, Clone, Copy)]
pub struct AgentDefinition {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

/// What a stage must do
#[derive(Debug, Clone, Copy)]
pub struct TaskDefinition {
    pub description: &'static str,
    pub expected_output: &'static str,
}

const MATCHER: AgentDefinition = AgentDefinition {
    role: "Emission Reduction Recommendation Matcher",
    goal: "Fetch every reference recommendation that belongs to the requested activities, exactly as stored.",
    backstory: "You work strictly from the reference dataset. You never invent, merge or reword records.",
};

const RANKER: AgentDefinition = AgentDefinition {
    role: "Emission Reduction Recommendation Ranker",
    goal: "Rank candidate recommendations by impactLevel and feasibilityLevel and select the best ones.",
    backstory: "You prioritise high-impact, feasible measures and never repeat advice the organisation already received.",
};

const FETCH_MULTI: TaskDefinition = TaskDefinition {
    description: "Select from all_records every record whose activityId is listed in activity_ids \
or whose activityName matches one of activity_names (case-insensitive). \
Copy matching records verbatim; do not alter any field.",
    expected_output: "A JSON object {\"recommendations\": [...]} containing the matching records. \
If no record matches, answer with the single word false.",
};

const FETCH_SINGLE: TaskDefinition = TaskDefinition {
    description: "Select from all_records every record whose activityId is listed in activity_ids \
or whose activityName matches one of activity_names (case-insensitive). \
Drop every record whose recommendation text exactly equals an entry of history. \
Copy the remaining records verbatim; do not alter any field.",
    expected_output: "A JSON object {\"recommendations\": [...]} containing the remaining records. \
If no record remains, answer with the single word false.",
};

const RANK_AND_SELECT: TaskDefinition = TaskDefinition {
    description: "The candidates are given in context. Rank them by impactLevel (HIGH, MEDIUM, LOW), \
then by feasibilityLevel (HIGH, MEDIUM, LOW), then by feasibilityScore. \
Select at most maxRecommendationAmount records. \
Never select a record whose recommendation text exactly equals an entry of history. \
Copy selected records verbatim; do not alter any field.",
    expected_output: "A JSON object {\"recommendations\": [...]} with the selected records in rank order. \
If nothing can be selected, answer with the single word false.",
};

pub fn agent_definition(role: AgentRole) -> &'static AgentDefinition {
    match role {
        AgentRole::Matcher => &MATCHER,
        AgentRole::Ranker => &RANKER,
    }
}

pub fn task_definition(stage: Stage) -> &'static TaskDefinition {
    match stage {
        Stage::FetchCandidatesMulti => &FETCH_MULTI,
        Stage::FetchCandidatesSingle => &FETCH_SINGLE,
        Stage::RankAndSelect => &RANK_AND_SELECT,
    }
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Build the system and user messages for a stage invocation
pub fn render_messages(stage: Stage, inputs: &StageInputs) -> Result<Vec<ChatMessage>> {
    let agent = agent_definition(stage.agent());
    let task = task_definition(stage);

    let system = format!(
        "You are the {}.\nGoal: {}\n{}\nRespond with the requested output only, without commentary.",
        agent.role, agent.goal, agent.backstory
    );
    let user = format!(
        "Task: {}\n\nExpected output: {}\n\nInputs:\n{}",
        task.description,
        task.expected_output,
        serde_json::to_string_pretty(inputs)?
    );

    Ok(vec![
        ChatMessage { role: "system", content: system },
        ChatMessage { role: "user", content: user },
    ])
}
