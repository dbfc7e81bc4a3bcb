//! Component lifecycle trait
//!
//! A component owns exactly one kind of remote resource and exposes two entry
//! points: `deploy` converges the resource to the inputs, `remove` tears it
//! down. State between cycles is owned by the caller and handed back in on the
//! next call.

use crate::context::LifecycleContext;
use async_trait::async_trait;

/// Core trait for deployable components
///
/// Collaborators (API clients, file readers) are injected when the
/// implementing type is constructed; per-call concerns (identity, event sink)
/// travel in the [`LifecycleContext`].
///
/// # Example
///
/// ```ignore
/// use declarative::{Component, LifecycleContext, EventKind};
///
/// struct Bucket { api: BucketApi }
///
/// #[async_trait::async_trait]
/// impl Component for Bucket {
///     type Inputs = BucketInputs;
///     type State = BucketState;
///     type Error = BucketError;
///
///     fn component_type(&self) -> &'static str { "bucket" }
///
///     async fn deploy(&self, inputs: BucketInputs, prior: &BucketState, ctx: &mut LifecycleContext<'_>)
///         -> Result<BucketState, BucketError> { ... }
///
///     async fn remove(&self, prior: &BucketState, ctx: &mut LifecycleContext<'_>)
///         -> Result<BucketState, BucketError> { ... }
/// }
/// ```
#[async_trait]
pub trait Component: Send + Sync {
    /// Declarative inputs for one deploy
    type Inputs: Send;

    /// Snapshot persisted between cycles; `Default` is the empty state
    type State: Default + Send + Sync;

    /// Error returned by lifecycle operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Component type name, used in progress output
    fn component_type(&self) -> &'static str;

    /// Converge the resource to `inputs` and return the new state
    async fn deploy(
        &self,
        inputs: Self::Inputs,
        prior: &Self::State,
        ctx: &mut LifecycleContext<'_>,
    ) -> Result<Self::State, Self::Error>;

    /// Remove the resource described by `prior` and return the empty state
    ///
    /// Removing a component that was never deployed must succeed.
    async fn remove(
        &self,
        prior: &Self::State,
        ctx: &mut LifecycleContext<'_>,
    ) -> Result<Self::State, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{EventKind, InstanceIdentity, RecordingSink};
    use std::sync::Mutex;

    #[derive(Debug)]
    enum Never {}

    impl std::fmt::Display for Never {
        fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match *self {}
        }
    }

    impl std::error::Error for Never {}

    #[derive(Default)]
    struct Counter {
        deploys: Mutex<u32>,
    }

    #[async_trait]
    impl Component for Counter {
        type Inputs = u32;
        type State = Option<u32>;
        type Error = Never;

        fn component_type(&self) -> &'static str {
            "counter"
        }

        async fn deploy(
            &self,
            inputs: u32,
            _prior: &Option<u32>,
            ctx: &mut LifecycleContext<'_>,
        ) -> Result<Option<u32>, Never> {
            *self.deploys.lock().unwrap() += 1;
            ctx.emit("counter", EventKind::Update, format!("set to {inputs}"));
            Ok(Some(inputs))
        }

        async fn remove(
            &self,
            _prior: &Option<u32>,
            ctx: &mut LifecycleContext<'_>,
        ) -> Result<Option<u32>, Never> {
            ctx.emit("counter", EventKind::Remove, "removed");
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_component_lifecycle() {
        let component = Counter::default();
        let identity = InstanceIdentity::default();
        let mut sink = RecordingSink::new();

        let state = {
            let mut ctx = LifecycleContext::new(&identity, &mut sink);
            let state = component.deploy(7, &None, &mut ctx).await.unwrap();
            component.remove(&state, &mut ctx).await.unwrap()
        };

        assert_eq!(state, None);
        assert_eq!(*component.deploys.lock().unwrap(), 1);
        assert_eq!(sink.events.len(), 2);
        assert_eq!(sink.events[0].message, "set to 7");
    }
}
