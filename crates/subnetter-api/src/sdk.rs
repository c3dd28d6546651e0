use crate::client::{CloudFormationStacks, ProviderConfig};
use serde::Serialize;
use subnetter_core::{
    divide_block, AddressBlock, AddressPool, AllocationError, Allocator, DiagnosticSink,
    LifecycleState, LogSink, StackLister, StatusNormalizer, SubBlock,
};

/// An application stack as operators see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppStatus {
    pub name: String,
    pub subnet: Option<AddressBlock>,
    pub status: LifecycleState,
}

/// Main SDK struct for Subnetter
pub struct Subnetter<L = CloudFormationStacks, S = LogSink> {
    allocator: Allocator<L>,
    normalizer: StatusNormalizer<S>,
}

impl Subnetter {
    /// Connect to CloudFormation using the given configuration
    pub async fn connect<C>(config: &C, pool: AddressPool) -> Result<Self, C::Error>
    where
        C: ProviderConfig,
    {
        let stacks = CloudFormationStacks::from_config(config).await?;
        Ok(Self::new(stacks, pool, LogSink))
    }
}

impl<L: StackLister, S: DiagnosticSink> Subnetter<L, S> {
    pub fn new(lister: L, pool: AddressPool, sink: S) -> Self {
        Self {
            allocator: Allocator::new(lister, pool),
            normalizer: StatusNormalizer::new(sink),
        }
    }

    pub fn lister(&self) -> &L {
        self.allocator.lister()
    }

    pub fn pool(&self) -> &AddressPool {
        self.allocator.pool()
    }

    /// Next free application block
    pub async fn next_available_block(&self) -> Result<AddressBlock, AllocationError> {
        self.allocator.next_available_block().await
    }

    /// Split a block into `count` placement ranges
    pub fn divide(&self, block: &AddressBlock, count: usize) -> subnetter_core::Result<Vec<SubBlock>> {
        divide_block(block, count)
    }

    /// Canonical state of a provider status string
    pub fn status(&self, provider_status: &str) -> LifecycleState {
        self.normalizer.normalize(provider_status)
    }

    /// Application stacks with their subnet and canonical status, by name
    pub async fn apps(&self) -> Result<Vec<AppStatus>, AllocationError> {
        let stacks = self
            .lister()
            .list_active_stacks()
            .await
            .map_err(|e| AllocationError::QueryFailed(Box::new(e)))?;

        let mut apps: Vec<AppStatus> = stacks
            .iter()
            .filter(|stack| stack.is_app())
            .map(|stack| AppStatus {
                name: stack.name.clone(),
                subnet: stack.allocation().map(|record| record.block),
                status: self.normalizer.normalize(&stack.status),
            })
            .collect();

        apps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(apps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use subnetter_core::StackSummary;

    struct MemoryStacks(Vec<StackSummary>);

    impl StackLister for MemoryStacks {
        type Error = io::Error;

        async fn list_active_stacks(&self) -> Result<Vec<StackSummary>, io::Error> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct CountingSink(AtomicUsize);

    impl DiagnosticSink for CountingSink {
        fn emit(&self, _message: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn sdk() -> Subnetter<MemoryStacks, CountingSink> {
        let stacks = vec![
            StackSummary::new("worker", "UPDATE_COMPLETE")
                .with_tag("type", "app")
                .with_tag("subnet", "10.0.2.0/24"),
            StackSummary::new("api", "CREATE_COMPLETE")
                .with_tag("type", "app")
                .with_tag("subnet", "10.0.1.0/24"),
            StackSummary::new("convox", "CREATE_COMPLETE").with_tag("type", "cluster"),
        ];
        Subnetter::new(
            MemoryStacks(stacks),
            AddressPool::default(),
            CountingSink::default(),
        )
    }

    #[tokio::test]
    async fn test_next_available_block() {
        let block = sdk().next_available_block().await.unwrap();
        assert_eq!(block.to_string(), "10.0.3.0/24");
    }

    #[tokio::test]
    async fn test_apps_listing() {
        let sdk = sdk();
        let apps = sdk.apps().await.unwrap();

        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].name, "api");
        assert_eq!(apps[0].status, LifecycleState::Running);
        assert_eq!(apps[1].name, "worker");
        assert_eq!(apps[1].status, LifecycleState::Unknown);
        assert_eq!(apps[1].subnet.map(|b| b.to_string()), Some("10.0.2.0/24".to_string()));

        // UPDATE_COMPLETE has no mapping
        assert_eq!(sdk.normalizer.sink().0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_app_status_json() {
        let status = AppStatus {
            name: "api".to_string(),
            subnet: Some("10.0.1.0/24".parse().unwrap()),
            status: LifecycleState::Creating,
        };

        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!({"name": "api", "subnet": "10.0.1.0/24", "status": "creating"})
        );
    }

    #[test]
    fn test_divide_and_status() {
        let sdk = sdk();
        let block: AddressBlock = "10.0.7.0/24".parse().unwrap();

        assert_eq!(sdk.divide(&block, 2).unwrap().len(), 2);
        assert!(sdk.divide(&block, 5).is_err());
        assert_eq!(sdk.status("DELETE_FAILED"), LifecycleState::Running);
    }
}
