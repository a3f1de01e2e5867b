//! Soft skills expected for a job

use emploistore_domain::constants::SCOPE_SOFT_SKILLS;
use emploistore_domain::{Record, Result};
use serde::Deserialize;
use serde_json::Map;

use crate::client::EmploiStoreClient;

const JOB_SKILLS_PATH: &str = "/matchviasoftskills/v1/professions/job_skills";

#[derive(Debug, Deserialize)]
struct JobSkills {
    #[serde(default)]
    skills: Map<String, serde_json::Value>,
}

impl EmploiStoreClient {
    /// Soft skills of a ROME job code, in the order the API lists them.
    ///
    /// # Errors
    /// Returns `Decode` when a skill is not an object, plus gateway errors.
    pub fn get_match_via_soft_skills(&self, rome: &str) -> Result<Vec<Record>> {
        let response =
            self.gateway().post_json(SCOPE_SOFT_SKILLS, JOB_SKILLS_PATH, &[("code", rome.to_string())])?;
        let JobSkills { skills } = serde_json::from_value(response)?;

        skills
            .into_iter()
            .map(|(_, skill)| serde_json::from_value(skill).map_err(Into::into))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use emploistore_core::Method;
    use emploistore_domain::EmploiStoreError;
    use serde_json::json;

    use super::*;
    use crate::client::testing::mock_client;

    #[test]
    fn skills_keep_server_order() {
        let (client, transport) = mock_client();
        transport.respond(
            Method::Post,
            "/job_skills",
            200,
            &json!({"uri": "/rome/A1204", "skills": {
                "soft_skill_3": {"summary": "Persévérance", "score": 3},
                "soft_skill_1": {"summary": "Autonomie", "score": 5}
            }}),
        );

        let skills = client.get_match_via_soft_skills("A1204").unwrap();

        let summaries: Vec<_> = skills.iter().map(|s| s["summary"].as_str().unwrap()).collect();
        assert_eq!(summaries, vec!["Persévérance", "Autonomie"]);
        let call = &transport.requests_to("/job_skills")[0];
        assert_eq!(call.method, Method::Post);
        assert_eq!(call.query_value("code"), Some("A1204"));
    }

    #[test]
    fn non_object_skill_is_decode_error() {
        let (client, transport) = mock_client();
        transport.respond(Method::Post, "/job_skills", 200, &json!({"skills": {"a": 1}}));

        let result = client.get_match_via_soft_skills("A1204");

        assert!(matches!(result, Err(EmploiStoreError::Decode(_))));
    }
}
