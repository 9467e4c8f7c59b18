//! Shared fakes and fixtures for startup and engine tests.
#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use bootkube::config::StartupConfig;
use bootkube::engine::{BootstrapEngine, EngineError, EngineFactory};
use bootkube::etcd::{CoordStoreBootstrapper, EtcdError};
use bootkube::observability::{LogError, LogSink};
use bootkube::Startup;

/// One observed collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    EtcdStart(String),
    EngineBuild(StartupConfig),
    EngineRun,
    LogInit,
    LogFlush,
}

/// Ordered log of collaborator calls, shared by all fakes in a test.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Call>>>);

impl Recorder {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn flushes(&self) -> usize {
        self.count(|c| matches!(c, Call::LogFlush))
    }
}

pub struct FakeEtcd {
    recorder: Recorder,
    fail: bool,
}

impl CoordStoreBootstrapper for FakeEtcd {
    async fn start(&mut self, endpoint: &str) -> Result<(), EtcdError> {
        self.recorder.push(Call::EtcdStart(endpoint.to_string()));
        if self.fail {
            return Err(EtcdError::Unhealthy("member refused to start".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunOutcome {
    #[default]
    Succeed,
    Fail,
    Panic,
}

pub struct FakeEngines {
    recorder: Recorder,
    build_fails: bool,
    outcome: RunOutcome,
}

impl EngineFactory for FakeEngines {
    type Engine = FakeEngine;

    fn build(&self, config: StartupConfig) -> Result<FakeEngine, EngineError> {
        self.recorder.push(Call::EngineBuild(config));
        if self.build_fails {
            return Err(EngineError::NoBootstrapManifests(
                "/tmp/assets/bootstrap-manifests".into(),
            ));
        }
        Ok(FakeEngine {
            recorder: self.recorder.clone(),
            outcome: self.outcome,
        })
    }
}

pub struct FakeEngine {
    recorder: Recorder,
    outcome: RunOutcome,
}

impl BootstrapEngine for FakeEngine {
    async fn run(self) -> Result<(), EngineError> {
        self.recorder.push(Call::EngineRun);
        match self.outcome {
            RunOutcome::Succeed => Ok(()),
            RunOutcome::Fail => Err(EngineError::Etcd(EtcdError::Unhealthy(
                "lost quorum".into(),
            ))),
            RunOutcome::Panic => panic!("engine crashed"),
        }
    }
}

pub struct FakeSink {
    recorder: Recorder,
    fail_init: bool,
}

impl LogSink for FakeSink {
    fn init(&mut self) -> Result<(), LogError> {
        self.recorder.push(Call::LogInit);
        if self.fail_init {
            return Err(log_init_error());
        }
        Ok(())
    }

    fn flush(&mut self) {
        self.recorder.push(Call::LogFlush);
    }
}

/// A real `LogError`: the second global subscriber install always fails.
pub fn log_init_error() -> LogError {
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry().try_init();
    match tracing_subscriber::registry().try_init() {
        Err(e) => LogError::from(e),
        Ok(()) => panic!("second subscriber install unexpectedly succeeded"),
    }
}

/// Which collaborators should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scenario {
    pub etcd_fails: bool,
    pub build_fails: bool,
    pub log_init_fails: bool,
    pub outcome: RunOutcome,
}

impl Scenario {
    pub fn startup(&self, recorder: &Recorder) -> Startup<FakeEtcd, FakeEngines, FakeSink> {
        Startup::new(
            FakeEtcd {
                recorder: recorder.clone(),
                fail: self.etcd_fails,
            },
            FakeEngines {
                recorder: recorder.clone(),
                build_fails: self.build_fails,
                outcome: self.outcome,
            },
            FakeSink {
                recorder: recorder.clone(),
                fail_init: self.log_init_fails,
            },
        )
    }

    /// Sink-only variant for running the real engine.
    pub fn fake_etcd_and_sink(&self, recorder: &Recorder) -> (FakeEtcd, FakeSink) {
        (
            FakeEtcd {
                recorder: recorder.clone(),
                fail: self.etcd_fails,
            },
            FakeSink {
                recorder: recorder.clone(),
                fail_init: self.log_init_fails,
            },
        )
    }
}

/// Start a mock etcd that answers every request with `{"health":"<health>"}`.
pub async fn start_mock_etcd(health: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;

                        let body = format!("{{\"health\":\"{}\"}}", health);
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Lay out a rendered asset directory with the given bootstrap manifests.
pub fn render_assets(root: &Path, bootstrap_manifests: &[&str]) {
    fs::create_dir_all(root.join("bootstrap-manifests")).unwrap();
    fs::create_dir_all(root.join("manifests")).unwrap();
    fs::create_dir_all(root.join("auth")).unwrap();
    fs::write(root.join("auth/kubeconfig"), "apiVersion: v1\nkind: Config\n").unwrap();
    fs::write(root.join("manifests/kube-apiserver.yaml"), "kind: DaemonSet\n").unwrap();

    for name in bootstrap_manifests {
        fs::write(root.join("bootstrap-manifests").join(name), "kind: Pod\n").unwrap();
    }
}
