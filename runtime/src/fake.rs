//! In-memory `ContainerRuntime` used by the reconciler tests.
//!
//! Records every call in order and keeps just enough container state
//! (spec, running flag, address, hosts file) to assert on outcomes.

use std::sync::Mutex;

use async_trait::async_trait;
use nodestack_core::error::{Result, StackError};
use nodestack_core::hosts::HOSTS_PATH;
use nodestack_core::runtime::{
    ContainerDetails, ContainerRuntime, ContainerSpec, ContainerSummary, ExecOutput, Removal,
};

#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub id: String,
    pub spec: ContainerSpec,
    pub running: bool,
    pub ip_address: Option<String>,
    pub hosts: Option<String>,
    pub execs: Vec<Vec<String>>,
}

#[derive(Default)]
struct Inner {
    containers: Vec<FakeContainer>,
    calls: Vec<String>,
    next_id: u32,
    next_ip: u8,
    remove_error: Option<String>,
    create_error: Option<String>,
    exec_exit_code: i64,
    vanish_on_inspect: Option<String>,
    inspect_error: Option<String>,
}

#[derive(Default)]
pub struct FakeRuntime {
    inner: Mutex<Inner>,
}

impl FakeRuntime {
    /// A runtime already holding created (not running) containers.
    pub fn with_containers(names: &[&str]) -> Self {
        let runtime = FakeRuntime::default();
        {
            let mut inner = runtime.inner.lock().unwrap();
            for name in names {
                let id = next_id(&mut inner);
                inner.containers.push(FakeContainer {
                    id,
                    spec: ContainerSpec {
                        name: name.to_string(),
                        image: "old:image".to_string(),
                        ..Default::default()
                    },
                    running: false,
                    ip_address: None,
                    hosts: None,
                    execs: vec![],
                });
            }
        }
        runtime
    }

    /// Mark a container running and give it an address.
    pub fn set_running(&self, name: &str, ip: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(c) = inner.containers.iter_mut().find(|c| c.spec.name == name) {
            c.running = true;
            c.ip_address = Some(ip.to_string());
        }
    }

    /// Make every removal fail with a non-404 error.
    pub fn fail_removals(&self, message: &str) {
        self.inner.lock().unwrap().remove_error = Some(message.to_string());
    }

    /// Make creation of `name` fail.
    pub fn fail_create(&self, name: &str) {
        self.inner.lock().unwrap().create_error = Some(name.to_string());
    }

    /// Drop `name` when it is next inspected, as if removed after listing.
    pub fn vanish_on_inspect(&self, name: &str) {
        self.inner.lock().unwrap().vanish_on_inspect = Some(name.to_string());
    }

    /// Make inspection of `name` fail with a non-404 error.
    pub fn fail_inspect(&self, name: &str) {
        self.inner.lock().unwrap().inspect_error = Some(name.to_string());
    }

    /// Exit code reported for non-hosts commands.
    pub fn set_exec_exit_code(&self, code: i64) {
        self.inner.lock().unwrap().exec_exit_code = code;
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn container(&self, name: &str) -> Option<FakeContainer> {
        self.inner
            .lock()
            .unwrap()
            .containers
            .iter()
            .find(|c| c.spec.name == name)
            .cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .containers
            .iter()
            .map(|c| c.spec.name.clone())
            .collect()
    }
}

fn next_id(inner: &mut Inner) -> String {
    inner.next_id += 1;
    format!("{:064x}", inner.next_id)
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("list".to_string());
        Ok(inner
            .containers
            .iter()
            .map(|c| ContainerSummary {
                id: c.id.clone(),
                name: c.spec.name.clone(),
                status: if c.running { "Up" } else { "Created" }.to_string(),
                state: if c.running { "running" } else { "created" }.to_string(),
                image: c.spec.image.clone(),
            })
            .collect())
    }

    async fn inspect_container(&self, name: &str) -> Result<ContainerDetails> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("inspect {name}"));
        if inner.vanish_on_inspect.as_deref() == Some(name) {
            inner.vanish_on_inspect = None;
            inner.containers.retain(|c| c.spec.name != name);
        }
        if inner.inspect_error.as_deref() == Some(name) {
            return Err(StackError::Runtime {
                operation: "inspect".to_string(),
                container: name.to_string(),
                message: "daemon unavailable".to_string(),
            });
        }
        let c = inner
            .containers
            .iter()
            .find(|c| c.spec.name == name)
            .ok_or_else(|| StackError::NotFound(name.to_string()))?;
        Ok(ContainerDetails {
            id: c.id.clone(),
            name: c.spec.name.clone(),
            ip_address: c.ip_address.clone(),
            running: c.running,
            volumes_from: c.spec.volumes_from.clone(),
            binds: c.spec.binds.clone(),
        })
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("create {}", spec.name));
        if inner.create_error.as_deref() == Some(spec.name.as_str()) {
            return Err(StackError::Runtime {
                operation: "create".to_string(),
                container: spec.name.clone(),
                message: "image not found".to_string(),
            });
        }
        if inner.containers.iter().any(|c| c.spec.name == spec.name) {
            return Err(StackError::Runtime {
                operation: "create".to_string(),
                container: spec.name.clone(),
                message: "name already in use".to_string(),
            });
        }
        let id = next_id(&mut inner);
        inner.containers.push(FakeContainer {
            id: id.clone(),
            spec: spec.clone(),
            running: false,
            ip_address: None,
            hosts: None,
            execs: vec![],
        });
        Ok(id)
    }

    async fn start_container(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("start {name}"));
        inner.next_ip += 1;
        let ip = format!("172.17.0.{}", inner.next_ip + 1);
        let c = inner
            .containers
            .iter_mut()
            .find(|c| c.spec.name == name)
            .ok_or_else(|| StackError::NotFound(name.to_string()))?;
        c.running = true;
        c.ip_address = Some(ip);
        Ok(())
    }

    async fn remove_container(&self, name: &str) -> Result<Removal> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("remove {name}"));
        if let Some(message) = inner.remove_error.clone() {
            return Err(StackError::Runtime {
                operation: "remove".to_string(),
                container: name.to_string(),
                message,
            });
        }
        let before = inner.containers.len();
        inner.containers.retain(|c| c.spec.name != name);
        if inner.containers.len() < before {
            Ok(Removal::Removed)
        } else {
            Ok(Removal::Absent)
        }
    }

    async fn exec(&self, name: &str, cmd: &[String]) -> Result<ExecOutput> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("exec {name}"));
        let exit_code = inner.exec_exit_code;
        let c = inner
            .containers
            .iter_mut()
            .find(|c| c.spec.name == name)
            .ok_or_else(|| StackError::NotFound(name.to_string()))?;
        if !c.running {
            return Err(StackError::Runtime {
                operation: "exec".to_string(),
                container: name.to_string(),
                message: "container is not running".to_string(),
            });
        }
        c.execs.push(cmd.to_vec());

        let writes_hosts = cmd.len() == 5 && cmd[2].ends_with(HOSTS_PATH);
        if writes_hosts {
            c.hosts = Some(cmd[4].clone());
            return Ok(ExecOutput {
                output: String::new(),
                exit_code: Some(0),
            });
        }

        Ok(ExecOutput {
            output: format!("{name}: {}\n", cmd.join(" ")),
            exit_code: Some(exit_code),
        })
    }
}
