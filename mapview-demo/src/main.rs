//! Headless demonstration of the map view control core.
//!
//! Draws two Berlin routes, fits the camera to them, plays a short camera tour and then follows
//! a simulated device along the second route. Run with an optional path to a JSON config:
//!
//! ```text
//! RUST_LOG=debug cargo run -p mapview-demo -- mapview-demo/data/berlin.json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use mapview::camera::CameraUpdate;
use mapview::location::{CameraMode, IndicatorStatus, LocationIndicator};
use mapview::overlay::Marker;
use mapview::provider::HeadlessMapProvider;
use mapview::{MapController, SharedMapController};

use crate::config::DemoConfig;
use crate::render_loop::RenderLoop;
use crate::simulated_location::SimulatedLocationSource;

mod config;
mod render_loop;
mod simulated_location;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = DemoConfig::load(config_path.as_deref())?;

    let provider = HeadlessMapProvider::new(config.viewport);
    let render_loop = RenderLoop::new(provider.clone(), config.fps)?;
    provider.set_messenger(render_loop.messenger());
    render_loop.start()?;

    let controller = MapController::builder(provider.clone())
        .with_center(config.center)
        .with_zoom(config.zoom)
        .build()
        .into_shared();

    draw_routes(&controller, &config)?;

    let animation = config.animation();
    let fit = CameraUpdate::bounds(config.route_points(), config.padding);
    controller.lock().notify_camera_update(fit, animation)?;
    settle(&provider).await;
    log::info!("Camera fitted to routes: {:?}", controller.lock().camera());

    for update in config.tour.iter().cloned() {
        controller.lock().notify_camera_update(update, animation)?;
        settle(&provider).await;
    }

    follow_track(&controller, &config, &render_loop).await?;

    let camera = controller.lock().camera();
    log::info!(
        "Final camera: center ({:.6}, {:.6}), zoom {:.2}, bearing {:.1}, tilt {:.1}",
        camera.center.lat(),
        camera.center.lon(),
        camera.zoom,
        camera.bearing,
        camera.tilt
    );
    log::info!(
        "{} overlays drawn, {:?}",
        controller.lock().overlay_count(),
        render_loop.stats()
    );

    render_loop.stop()?;
    controller.lock().detach();

    Ok(())
}

fn draw_routes(controller: &SharedMapController, config: &DemoConfig) -> anyhow::Result<()> {
    let mut controller = controller.lock();

    for (index, route) in config.routes.iter().enumerate() {
        let polyline = route
            .polyline()
            .with_context(|| format!("invalid route {index}"))?;
        let ends: Vec<_> = [polyline.points().first(), polyline.points().last()]
            .into_iter()
            .flatten()
            .map(|point| Marker::builder(*point).build())
            .collect::<Result<_, _>>()?;

        controller.add_polyline(polyline)?;
        for marker in ends {
            controller.add_marker(marker)?;
        }
    }

    log::info!("Drawn {} routes", config.routes.len());
    Ok(())
}

async fn follow_track(
    controller: &SharedMapController,
    config: &DemoConfig,
    render_loop: &RenderLoop,
) -> anyhow::Result<()> {
    let source = SimulatedLocationSource::new(config.track.points.clone(), config.track.interval());
    let replay = source.duration();

    let mode = match config.animation() {
        Some(animation) => CameraMode::follow_animated(animation),
        None => CameraMode::follow(),
    };
    let mut indicator = LocationIndicator::new(controller, source).with_camera_mode(mode);
    indicator.set_status_listener(|status| match status {
        IndicatorStatus::Failed(err) => log::error!("Location indicator failed: {err}"),
        status => log::info!("Location indicator status: {status:?}"),
    });

    indicator.enable()?;

    // Halfway through, simulate the app going to background and back. The track restarts on
    // resume.
    let pause_at = tokio::time::sleep(replay / 2);
    let deadline = tokio::time::sleep(replay * 2 + Duration::from_millis(500));
    tokio::pin!(pause_at, deadline);
    let mut paused = false;

    loop {
        tokio::select! {
            active = indicator.next_event() => {
                if !active {
                    break;
                }
            }
            _ = &mut pause_at, if !paused => {
                paused = true;
                indicator.disable();
                render_loop.pause()?;
                tokio::time::sleep(config.track.interval() * 2).await;
                render_loop.resume()?;
                indicator.enable()?;
            }
            _ = &mut deadline => break,
        }
    }

    if let Some(sample) = indicator.last_known_location() {
        log::info!("Last known location: {:?}", sample.point);
    }
    indicator.disable();

    Ok(())
}

/// Waits until the camera transition in flight has been played by the render loop.
async fn settle(provider: &HeadlessMapProvider) {
    while provider.is_animating() {
        tokio::time::sleep(Duration::from_millis(16)).await;
    }
}
