//! Prompt construction for the loyalty customer analysis.
//!
//! The system prompt is fixed. The user prompt starts from a base instruction
//! and grows by one clause per piece of optional context the caller supplied.

use crate::extraction::{JSON_END, JSON_START};
use crate::models::AnalysisRequest;

/// Instructions sent as the `system` turn of every completion request.
pub const SYSTEM_PROMPT: &str = "You are a customer loyalty analyst. Given a company, \
identify the distinct customer segments that make up its loyalty base.

Reason about each segment along five dimensions:
1. Purchase behaviour: frequency, basket size and channel preference.
2. Reward preferences: which incentives the segment responds to.
3. Programme engagement: how actively the segment uses the loyalty programme.
4. Motivations: what drives the segment to stay with the brand.
5. Value and retention: lifetime value and the risk of churn.

Respond in two parts.
First, a natural-language analysis of the customer base and its segments.
Second, a JSON object describing the segments, placed between the literal markers \
[JSON_START] and [JSON_END], with this shape:
{
  \"customer_segments\": [
    {
      \"name\": \"string\",
      \"size_percentage\": number,
      \"characteristics\": [\"string\"],
      \"preferred_rewards\": [\"string\"],
      \"engagement_level\": \"High | Medium | Low\",
      \"lifetime_value\": \"string\"
    }
  ]
}
Do not place anything other than the JSON object between the markers.";

/// Previous generation plus the feedback to apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refinement<'a> {
    pub existing_output: &'a str,
    pub feedback: &'a str,
}

/// Optional context pulled out of an [`AnalysisRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptContext<'a> {
    pub company_name: &'a str,
    pub competitor_analysis: Option<&'a str>,
    pub refinement: Option<Refinement<'a>>,
}

impl<'a> PromptContext<'a> {
    /// Extracts prompt context from a request.
    ///
    /// Empty strings count as absent. A refinement is only produced when both
    /// the existing output and the feedback are present.
    pub fn from_request(request: &'a AnalysisRequest) -> Self {
        let competitor_analysis = request
            .previous_data
            .as_ref()
            .and_then(|data| present(data.competitor_analysis.as_deref()));

        let refinement = request.current_prompt_data.as_ref().and_then(|data| {
            let existing_output = present(data.existing_generated_output.as_deref())?;
            let feedback = present(data.user_feedback.as_deref())?;
            Some(Refinement {
                existing_output,
                feedback,
            })
        });

        Self {
            company_name: request.company_name.trim(),
            competitor_analysis,
            refinement,
        }
    }

    /// Builds the `user` turn for this context.
    pub fn user_prompt(&self) -> String {
        let mut prompt = base_instruction(self.company_name);

        if let Some(competitor_analysis) = self.competitor_analysis {
            prompt.push_str(&format!(
                "\n\nTake the following competitor analysis into account when describing \
                 how these customers compare with those of competing brands:\n{}",
                competitor_analysis
            ));
        }

        if let Some(refinement) = self.refinement {
            prompt.push_str(&format!(
                "\n\nA previous version of this analysis was:\n{}\n\n\
                 Revise it according to this feedback:\n{}",
                refinement.existing_output, refinement.feedback
            ));
        }

        prompt
    }
}

/// The instruction every user prompt starts with.
pub fn base_instruction(company_name: &str) -> String {
    format!(
        "Analyze the loyalty customer base of {} and describe its customer segments. \
         Remember to wrap the JSON object in {} and {}.",
        company_name, JSON_START, JSON_END
    )
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrentPromptData, PreviousData};

    fn request(company: &str) -> AnalysisRequest {
        AnalysisRequest {
            company_name: company.to_string(),
            previous_data: None,
            current_prompt_data: None,
            other_input_data: None,
        }
    }

    #[test]
    fn test_company_only_prompt_is_base_instruction() {
        let req = request("Acme Coffee");
        let ctx = PromptContext::from_request(&req);

        assert_eq!(ctx.competitor_analysis, None);
        assert_eq!(ctx.refinement, None);
        assert_eq!(ctx.user_prompt(), base_instruction("Acme Coffee"));
    }

    #[test]
    fn test_competitor_analysis_is_included_verbatim() {
        let mut req = request("Acme Coffee");
        req.previous_data = Some(PreviousData {
            competitor_analysis: Some("Rival Roasters runs a punch-card scheme.".to_string()),
        });

        let prompt = PromptContext::from_request(&req).user_prompt();

        assert!(prompt.starts_with(&base_instruction("Acme Coffee")));
        assert!(prompt.contains("Rival Roasters runs a punch-card scheme."));
        assert!(!prompt.contains("feedback"));
    }

    #[test]
    fn test_refinement_requires_both_output_and_feedback() {
        let mut req = request("Acme Coffee");
        req.current_prompt_data = Some(CurrentPromptData {
            existing_generated_output: Some("Earlier draft".to_string()),
            user_feedback: Some("Add a student segment".to_string()),
        });

        let prompt = PromptContext::from_request(&req).user_prompt();
        assert!(prompt.contains("Earlier draft"));
        assert!(prompt.contains("Add a student segment"));
    }

    #[test]
    fn test_half_refinement_adds_nothing() {
        let mut only_output = request("Acme Coffee");
        only_output.current_prompt_data = Some(CurrentPromptData {
            existing_generated_output: Some("Earlier draft".to_string()),
            user_feedback: None,
        });

        let mut only_feedback = request("Acme Coffee");
        only_feedback.current_prompt_data = Some(CurrentPromptData {
            existing_generated_output: None,
            user_feedback: Some("Add a student segment".to_string()),
        });

        for req in [only_output, only_feedback] {
            let prompt = PromptContext::from_request(&req).user_prompt();
            assert_eq!(prompt, base_instruction("Acme Coffee"));
        }
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let mut req = request("Acme Coffee");
        req.previous_data = Some(PreviousData {
            competitor_analysis: Some("   ".to_string()),
        });
        req.current_prompt_data = Some(CurrentPromptData {
            existing_generated_output: Some("Earlier draft".to_string()),
            user_feedback: Some(String::new()),
        });

        let ctx = PromptContext::from_request(&req);
        assert_eq!(ctx.competitor_analysis, None);
        assert_eq!(ctx.refinement, None);
    }

    #[test]
    fn test_system_prompt_states_output_contract() {
        assert!(SYSTEM_PROMPT.contains(JSON_START));
        assert!(SYSTEM_PROMPT.contains(JSON_END));
        assert!(SYSTEM_PROMPT.contains("customer_segments"));
        assert!(SYSTEM_PROMPT.contains("preferred_rewards"));
    }
}
