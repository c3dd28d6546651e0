use crate::errors::{ApiError, Result};
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::config::Region;
use aws_sdk_cloudformation::error::DisplayErrorContext;
use aws_sdk_cloudformation::types::{Output, Stack, StackStatus};
use aws_sdk_cloudformation::Client;
use log::{debug, error};
use std::collections::BTreeMap;
use subnetter_core::{StackLister, StackSummary};
use subnetter_utils::{flatten_tags, outputs_with_prefix};

/// Trait for providing configuration to the CloudFormation client
/// This allows the main application to implement config without circular dependencies
pub trait ProviderConfig {
    type Error;

    /// AWS region override, `None` defers to the SDK's provider chain
    fn get_region(&self) -> std::result::Result<Option<String>, Self::Error> {
        Ok(None)
    }
}

/// Stack listing and output lookup backed by CloudFormation
#[derive(Debug, Clone)]
pub struct CloudFormationStacks {
    client: Client,
}

// Accepts both required (`&str`) and optional (`Option<&str>`) model fields
fn text<'a>(value: impl Into<Option<&'a str>>) -> String {
    value.into().unwrap_or_default().to_string()
}

fn status_text(status: Option<&StackStatus>) -> String {
    status.map(|s| s.as_str().to_string()).unwrap_or_default()
}

// Outputs without a key cannot be looked up and are dropped
fn summary_from_parts<'a>(
    name: String,
    status: String,
    tags: impl IntoIterator<Item = (String, String)>,
    outputs: impl IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
) -> StackSummary {
    StackSummary {
        name,
        status,
        tags: flatten_tags(tags),
        outputs: flatten_tags(
            outputs
                .into_iter()
                .filter_map(|(key, value)| Some((key?.to_string(), text(value)))),
        ),
    }
}

fn output_pair(output: &Output) -> (Option<&str>, Option<&str>) {
    (output.output_key().into(), output.output_value().into())
}

/// Convert an SDK stack into the provider-neutral summary
pub fn summarize(stack: &Stack) -> StackSummary {
    let tags = stack
        .tags()
        .iter()
        .map(|tag| (text(tag.key()), text(tag.value())));

    let outputs = stack.outputs().iter().map(output_pair);

    summary_from_parts(
        text(stack.stack_name()),
        status_text(stack.stack_status().into()),
        tags,
        outputs,
    )
}

/// The single stack a by-name DescribeStacks call should return
fn exactly_one<'a, T>(stacks: &'a [T], stack_name: &str) -> Result<&'a T> {
    match stacks {
        [stack] => Ok(stack),
        _ => Err(ApiError::StackNotFound(stack_name.to_string())),
    }
}

impl CloudFormationStacks {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Load AWS configuration from the environment, optionally pinning a region
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            debug!("Using AWS region {}", region);
            loader = loader.region(Region::new(region));
        }

        let config = loader.load().await;
        Self::new(Client::new(&config))
    }

    /// Create a client from any configuration implementing `ProviderConfig`
    pub async fn from_config<C>(config: &C) -> std::result::Result<Self, C::Error>
    where
        C: ProviderConfig,
    {
        let region = config.get_region()?;
        Ok(Self::from_env(region).await)
    }

    /// DescribeStacks, following pagination until exhausted
    async fn describe(&self, stack_name: Option<&str>) -> Result<Vec<Stack>> {
        let mut stacks = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            debug!(
                "DescribeStacks stack={:?} page_token={}",
                stack_name,
                next_token.is_some()
            );

            let output = self
                .client
                .describe_stacks()
                .set_stack_name(stack_name.map(str::to_string))
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    error!("DescribeStacks failed: {}", DisplayErrorContext(&e));
                    ApiError::DescribeStacks(DisplayErrorContext(&e).to_string())
                })?;

            stacks.extend(output.stacks().iter().cloned());

            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!("DescribeStacks returned {} stacks", stacks.len());
        Ok(stacks)
    }

    /// All outputs of one stack, keyed by output name
    pub async fn stack_outputs(&self, stack_name: &str) -> Result<BTreeMap<String, String>> {
        let stacks = self.describe(Some(stack_name)).await?;

        let stack = exactly_one(&stacks, stack_name)?;
        Ok(summarize(stack).outputs)
    }

    /// Output values of one stack whose keys start with `prefix`
    pub async fn stack_output_list(&self, stack_name: &str, prefix: &str) -> Result<Vec<String>> {
        let outputs = self.stack_outputs(stack_name).await?;
        Ok(outputs_with_prefix(&outputs, prefix))
    }
}

impl StackLister for CloudFormationStacks {
    type Error = ApiError;

    async fn list_active_stacks(&self) -> Result<Vec<StackSummary>> {
        let stacks = self.describe(None).await?;
        Ok(stacks.iter().map(summarize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_text_accepts_both_field_shapes() {
        assert_eq!(text("web"), "web");
        assert_eq!(text(Some("web")), "web");
        assert_eq!(text(None::<&str>), "");
    }

    #[test]
    fn test_status_text() {
        let status = StackStatus::from("ROLLBACK_COMPLETE");
        assert_eq!(status_text(Some(&status)), "ROLLBACK_COMPLETE");
        assert_eq!(status_text(None), "");
    }

    #[test]
    fn test_app_stack_summary() {
        let summary = summary_from_parts(
            "web".to_string(),
            status_text(Some(&StackStatus::from("CREATE_COMPLETE"))),
            pairs(&[("type", "app"), ("subnet", "10.0.4.0/24")]),
            vec![(Some("Subnet0"), Some("subnet-aaa")), (Some("Vpc"), None)],
        );

        assert_eq!(summary.name, "web");
        assert_eq!(summary.status, "CREATE_COMPLETE");
        assert!(summary.is_app());

        let record = summary.allocation().unwrap();
        assert_eq!(record.app, "web");
        assert_eq!(record.block.to_string(), "10.0.4.0/24");

        assert_eq!(summary.outputs.get("Subnet0"), Some(&"subnet-aaa".to_string()));
        assert_eq!(summary.outputs.get("Vpc"), Some(&String::new()));
    }

    #[test]
    fn test_outputs_without_key_are_dropped() {
        let summary = summary_from_parts(
            "convox".to_string(),
            status_text(None),
            pairs(&[("type", "cluster")]),
            vec![(None, Some("orphan")), (Some("Cluster"), Some("convox"))],
        );

        assert_eq!(summary.status, "");
        assert!(!summary.is_app());
        assert_eq!(summary.outputs.len(), 1);
        assert_eq!(summary.outputs.get("Cluster"), Some(&"convox".to_string()));
    }

    #[test]
    fn test_exactly_one_stack() {
        assert_eq!(exactly_one(&["web"], "web").unwrap(), &"web");

        let none: [&str; 0] = [];
        assert!(matches!(
            exactly_one(&none, "web"),
            Err(ApiError::StackNotFound(name)) if name == "web"
        ));
        assert!(matches!(
            exactly_one(&["web", "web"], "web"),
            Err(ApiError::StackNotFound(_))
        ));
    }
}
