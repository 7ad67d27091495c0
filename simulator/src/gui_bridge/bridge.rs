use crate::generator::profile::GeneratorConfig;
use crate::gui_bridge::model::DashboardModel;
use crate::workflow::runner::{Runner, WorkflowResult};
use anyhow::{anyhow, Result};
use log::{error, info, warn};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub fn dashboard_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct BridgeError;

impl warp::reject::Reject for BridgeError {}

type SharedModel = Arc<RwLock<DashboardModel>>;

fn store(state: &SharedModel, model: DashboardModel) -> Result<()> {
    let mut guard = state
        .write()
        .map_err(|_| anyhow!("dashboard state lock poisoned"))?;
    *guard = model;
    Ok(())
}

fn model_from(result: &WorkflowResult, scenario: Option<String>) -> DashboardModel {
    DashboardModel {
        scenario,
        sweeps_completed: result.sweeps_completed,
        elapsed_ms: result.elapsed_ms,
        report: Some(result.report.clone()),
    }
}

/// Single writer for the dashboard state plus the optional HTTP endpoint.
///
/// `GET /report` returns the latest model. `POST /scenario` takes a generator
/// config, reruns the workflow against it and replaces the model.
pub struct GuiBridge {
    state: SharedModel,
    runner: Arc<Runner>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(DashboardModel::default())),
            runner,
        }
    }

    /// Starts the HTTP endpoint on its own thread.
    pub fn serve(&self, address: SocketAddr) -> thread::JoinHandle<()> {
        let state_for_filter = self.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner = self.runner.clone();
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("report")
            .and(warp::get())
            .and(state_filter.clone())
            .and_then(|state: SharedModel| async move {
                match state.read() {
                    Ok(model) => Ok(warp::reply::json(&*model)),
                    Err(_) => Err(warp::reject::custom(BridgeError)),
                }
            });

        let scenario_route = warp::path("scenario")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |config: GeneratorConfig, state: SharedModel, runner: Arc<Runner>| async move {
                    let outcome = runner.execute_with(&config, None).and_then(|result| {
                        let model = model_from(&result, config.description.clone());
                        let headline = model.headline();
                        store(&state, model)?;
                        Ok(headline)
                    });
                    match outcome {
                        Ok(headline) => {
                            info!("[dashboard] scenario run -> {}", headline);
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "summary": headline,
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            warn!("[dashboard] scenario error: {:#}", err);
                            Err(warp::reject::custom(BridgeError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(scenario_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("[dashboard] failed to build runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(routes).run(address).await;
            });
        })
    }

    pub fn publish_result(&self, result: &WorkflowResult, scenario: Option<String>) -> Result<()> {
        self.publish(model_from(result, scenario))
    }

    pub fn publish(&self, model: DashboardModel) -> Result<()> {
        println!("[GUI] {}", model.headline());
        store(&self.state, model)
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> DashboardModel {
        self.state.read().unwrap().clone()
    }
}
