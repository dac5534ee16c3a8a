//! Fakes shared by the integration tests.
#![allow(dead_code)]

pub mod git;

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;

use mocopro_core::commands::ServerManager;
use mocopro_core::config::Settings;
use mocopro_core::context::AppContext;
use mocopro_core::error::{Error, Result};
use mocopro_core::git::GitClient;
use mocopro_core::registry::{EnvironmentVariables, RegistryStore};
use mocopro_core::runtime::{ContainerRuntime, ContainerStatus, RuntimeKind, StartRequest};
use mocopro_core::source;

/// One `start` call seen by [`FakeRuntime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCall {
    pub container_name: String,
    pub image: String,
    pub detach: bool,
    pub env: EnvironmentVariables,
}

#[derive(Debug, Default)]
pub struct RuntimeState {
    /// Container name -> running
    pub containers: BTreeMap<String, bool>,
    pub images: BTreeSet<String>,
    /// (context, image reference) of every build
    pub builds: Vec<(PathBuf, String)>,
    pub starts: Vec<StartCall>,
    pub fail_build: bool,
    pub fail_remove_container: bool,
    pub fail_remove_image: bool,
}

/// In-memory container runtime.
#[derive(Debug, Clone, Default)]
pub struct FakeRuntime {
    pub state: Rc<RefCell<RuntimeState>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self, repository: &str) -> bool {
        self.state
            .borrow()
            .containers
            .get(&source::container_name(repository))
            .copied()
            .unwrap_or(false)
    }
}

impl ContainerRuntime for FakeRuntime {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Podman
    }

    fn status(&self, repository: &str) -> Result<ContainerStatus> {
        let name = source::container_name(repository);
        let state = self.state.borrow();
        Ok(match state.containers.get(&name) {
            Some(running) => ContainerStatus {
                running: *running,
                container_id: Some(format!("id-{name}")),
                container_name: name,
            },
            None => ContainerStatus::absent(name),
        })
    }

    fn start(&self, request: &StartRequest<'_>) -> Result<()> {
        let name = source::container_name(request.repository);
        let mut state = self.state.borrow_mut();
        // Foreground runs have exited by the time start returns.
        state.containers.insert(name.clone(), request.detach);
        state.starts.push(StartCall {
            container_name: name,
            image: source::image_reference(request.image_name, request.image_tag),
            detach: request.detach,
            env: request.env.clone(),
        });
        Ok(())
    }

    fn stop(&self, repository: &str) -> Result<()> {
        let name = source::container_name(repository);
        let mut state = self.state.borrow_mut();
        match state.containers.get_mut(&name) {
            Some(running) if *running => {
                *running = false;
                Ok(())
            }
            _ => Err(Error::CommandFailed {
                program: "podman".to_string(),
                action: "stop".to_string(),
                code: Some(125),
            }),
        }
    }

    fn remove(&self, repository: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_remove_container {
            return Err(Error::CommandFailed {
                program: "podman".to_string(),
                action: "rm".to_string(),
                code: Some(1),
            });
        }
        state.containers.remove(&source::container_name(repository));
        Ok(())
    }

    fn build_image(&self, context: &Path, image_ref: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_build {
            return Err(Error::BuildFailed(Some(1)));
        }
        assert!(
            context.join("Dockerfile").is_file(),
            "build context must contain a Dockerfile"
        );
        state
            .builds
            .push((context.to_path_buf(), image_ref.to_string()));
        state.images.insert(image_ref.to_string());
        Ok(())
    }

    fn remove_image(&self, image_ref: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_remove_image {
            return Err(Error::ImageRemovalFailed(Some(1)));
        }
        state.images.remove(image_ref);
        Ok(())
    }

    fn image_exists(&self, image_ref: &str) -> bool {
        self.state.borrow().images.contains(image_ref)
    }
}

/// What a fake clone puts in the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoLayout {
    Dockerfile,
    Manifest,
    Empty,
}

#[derive(Debug)]
pub struct GitState {
    pub layout: RepoLayout,
    pub default_branch: String,
    pub clones: Vec<(String, PathBuf, Option<String>)>,
    pub pulls: Vec<PathBuf>,
    pub fail_clone: bool,
}

/// Git client that writes a canned checkout instead of cloning.
#[derive(Debug, Clone)]
pub struct FakeGit {
    pub state: Rc<RefCell<GitState>>,
}

impl FakeGit {
    pub fn new(layout: RepoLayout) -> Self {
        Self {
            state: Rc::new(RefCell::new(GitState {
                layout,
                default_branch: "main".to_string(),
                clones: Vec::new(),
                pulls: Vec::new(),
                fail_clone: false,
            })),
        }
    }
}

pub const MANIFEST: &str = "startCommand:
  type: stdio
  commandFunction: |
    (config) => ({
      command: 'node',
      args: ['build/index.js'],
      env: {}
    })
";

impl GitClient for FakeGit {
    fn clone_repo(&self, url: &str, dest: &Path, branch: Option<&str>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state
            .clones
            .push((url.to_string(), dest.to_path_buf(), branch.map(String::from)));

        std::fs::create_dir_all(dest).map_err(|e| Error::io("create checkout", e))?;
        if state.fail_clone {
            return Err(Error::Git {
                action: "clone".to_string(),
                stderr: "fatal: repository not found".to_string(),
            });
        }

        std::fs::write(dest.join("README.md"), "server").map_err(|e| Error::io("write", e))?;
        match state.layout {
            RepoLayout::Dockerfile => std::fs::write(dest.join("Dockerfile"), "FROM scratch\n"),
            RepoLayout::Manifest => std::fs::write(dest.join("smithery.yaml"), MANIFEST),
            RepoLayout::Empty => Ok(()),
        }
        .map_err(|e| Error::io("write", e))
    }

    fn pull(&self, path: &Path) -> Result<()> {
        self.state.borrow_mut().pulls.push(path.to_path_buf());
        Ok(())
    }

    fn current_branch(&self, _path: &Path) -> Result<String> {
        Ok(self.state.borrow().default_branch.clone())
    }
}

/// A manager over a temp directory with fake collaborators.
pub struct Harness {
    pub temp: TempDir,
    pub ctx: AppContext,
    pub runtime: FakeRuntime,
    pub git: FakeGit,
    pub manager: ServerManager,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(RepoLayout::Dockerfile, Settings::default())
    }

    pub fn with(layout: RepoLayout, settings: Settings) -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let home = temp.path().join("home");
        let project = temp.path().join("project");
        let state = temp.path().join("state");
        std::fs::create_dir_all(&home).expect("Failed to create home dir");
        std::fs::create_dir_all(&project).expect("Failed to create project dir");

        let ctx = AppContext::new(home, project, state);
        let runtime = FakeRuntime::new();
        let git = FakeGit::new(layout);
        let manager = ServerManager::new(ctx.clone(), settings, Box::new(git.clone()))
            .with_runtime(Box::new(runtime.clone()));

        Self {
            temp,
            ctx,
            runtime,
            git,
            manager,
        }
    }

    pub fn registry(&self) -> RegistryStore {
        self.ctx.registry_store()
    }

    /// Install `owner/repo` and return the registry name.
    pub fn install(&self, input: &str) -> String {
        self.manager.install(input).expect("install").name
    }
}
