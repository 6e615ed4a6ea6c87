use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Test report published by the artifact store for a single commit.
///
/// Timestamps are RFC 3339 strings with a literal `Z` suffix and are kept
/// as strings; parsing happens at render time. Unknown keys are ignored.
pub struct TestReport {
    pub hash: String,
    pub run_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub pull_request: String,
    pub started_at: String,
    pub completed_at: String,
    #[serde(default)]
    pub testcases: Vec<TestCase>,
    pub overall_status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Single testcase row within a [`TestReport`].
pub struct TestCase {
    pub testcase: String,
    pub status: String,
    pub started_at: String,
    pub completed_at: String,
}
