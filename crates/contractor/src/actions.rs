//! Typed wrappers around the remote actions the server exposes.
//!
//! Which kinds support which actions is expressed with marker traits, so
//! `resources.do_create(&site)` does not compile.

use cinp::Object;
use serde_json::Value;

use crate::client::Resources;
use crate::error::Result;
use crate::models::{
    AmtFoundation, AzureFoundation, BaseJob, Cartographer, DependencyJob, DockerFoundation,
    Foundation, FoundationJob, IpmiFoundation, LibVirtFoundation, ManualFoundation,
    PacketFoundation, ProxmoxFoundation, Site, Structure, StructureJob, TestFoundation,
    VCenterFoundation, VirtualBoxFoundation,
};
use crate::resource::Resource;

/// Kinds whose merged config values can be fetched.
pub trait Configurable: Resource {}

/// Kinds the server can build and tear down through jobs.
pub trait Buildable: Resource {}

/// Job kinds.
pub trait JobKind: Resource {}

macro_rules! mark {
    ($marker:ident: $($ty:ty),+ $(,)?) => {
        $(impl $marker for $ty {})+
    };
}

mark!(Configurable: Site, Structure, Foundation);
mark!(Buildable: Structure, Foundation);
mark!(
    Configurable: AmtFoundation, IpmiFoundation, ManualFoundation, LibVirtFoundation,
    ProxmoxFoundation, VCenterFoundation, VirtualBoxFoundation, AzureFoundation,
    DockerFoundation, PacketFoundation, TestFoundation,
);
mark!(
    Buildable: AmtFoundation, IpmiFoundation, ManualFoundation, LibVirtFoundation,
    ProxmoxFoundation, VCenterFoundation, VirtualBoxFoundation, AzureFoundation,
    DockerFoundation, PacketFoundation, TestFoundation,
);
mark!(JobKind: BaseJob, FoundationJob, StructureJob, DependencyJob);

impl<R: Configurable> Resources<R> {
    /// Fully merged config values (blueprint, site and object) as the
    /// server computes them.
    ///
    /// # Errors
    /// [`crate::Error::Action`] if the server rejects the call.
    pub async fn get_config(&self, object: &R) -> Result<Object> {
        self.call(object, "getConfig", Object::new()).await
    }
}

impl<R: Buildable> Resources<R> {
    /// Start a job building the object. Returns the job id the server
    /// reports.
    ///
    /// # Errors
    /// [`crate::Error::Action`] if the object can not be built right now,
    /// e.g. a job is already running for it.
    pub async fn do_create(&self, object: &R) -> Result<Value> {
        self.call(object, "doCreate", Object::new()).await
    }

    /// Start a job destroying the object. Returns the job id the server
    /// reports.
    ///
    /// # Errors
    /// As for [`Resources::do_create`].
    pub async fn do_destroy(&self, object: &R) -> Result<Value> {
        self.call(object, "doDestroy", Object::new()).await
    }

    /// URI of the job currently attached to the object, if any.
    ///
    /// # Errors
    /// [`crate::Error::Action`] if the server rejects the call.
    pub async fn get_job(&self, object: &R) -> Result<Option<String>> {
        self.call(object, "getJob", Object::new()).await
    }
}

impl<R: JobKind> Resources<R> {
    /// # Errors
    /// [`crate::Error::Action`] unless the job is running.
    pub async fn pause(&self, job: &R) -> Result<()> {
        self.call::<Value>(job, "pause", Object::new()).await?;
        Ok(())
    }

    /// # Errors
    /// [`crate::Error::Action`] unless the job is paused.
    pub async fn resume(&self, job: &R) -> Result<()> {
        self.call::<Value>(job, "resume", Object::new()).await?;
        Ok(())
    }

    /// Restart a job from its last completed step.
    ///
    /// # Errors
    /// [`crate::Error::Action`] unless the job is in error.
    pub async fn reset(&self, job: &R) -> Result<()> {
        self.call::<Value>(job, "reset", Object::new()).await?;
        Ok(())
    }

    /// Undo the steps a job has completed.
    ///
    /// # Errors
    /// [`crate::Error::Action`] unless the job is in error or paused.
    pub async fn rollback(&self, job: &R) -> Result<()> {
        self.call::<Value>(job, "rollback", Object::new()).await?;
        Ok(())
    }

    /// Raw state document of the job runner (script position, variables).
    ///
    /// # Errors
    /// [`crate::Error::Action`] if the server rejects the call.
    pub async fn job_runner_state(&self, job: &R) -> Result<Value> {
        self.call(job, "jobRunnerState", Object::new()).await
    }
}

impl Resources<Cartographer> {
    /// Assign the hardware behind `cartographer` to a foundation.
    ///
    /// # Errors
    /// [`crate::Error::Action`] if the server refuses the assignment.
    pub async fn assign(&self, cartographer: &Cartographer, foundation_uri: &str) -> Result<()> {
        let mut args = Object::new();
        args.insert("foundation".into(), Value::String(foundation_uri.to_string()));
        self.call::<Value>(cartographer, "assign", args).await?;
        Ok(())
    }
}
