//! Location source replaying a fixed track.

use std::time::Duration;

use mapview::location::{LocationError, LocationSample, LocationSink, LocationSource};
use mapview::Point;
use tokio::task::JoinHandle;

/// Replays track points on a tokio task, one every `interval`, with the bearing towards the
/// next point.
pub struct SimulatedLocationSource {
    track: Vec<Point>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl SimulatedLocationSource {
    /// Creates a source for the track.
    pub fn new(track: Vec<Point>, interval: Duration) -> Self {
        Self {
            track,
            interval,
            task: None,
        }
    }

    /// Time needed to replay the whole track.
    pub fn duration(&self) -> Duration {
        self.interval * self.track.len() as u32
    }
}

impl LocationSource for SimulatedLocationSource {
    fn start(&mut self, sink: LocationSink) -> Result<(), LocationError> {
        if self.track.is_empty() {
            return Err(LocationError::Unavailable("track is empty".into()));
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| LocationError::Unavailable(err.to_string()))?;

        let samples = track_samples(&self.track);
        let interval = self.interval;
        self.task = Some(runtime.spawn(async move {
            for sample in samples {
                if !sink.send_location(sample) {
                    return;
                }
                tokio::time::sleep(interval).await;
            }

            // Stay silent at the last position until the indicator stops listening.
            sink.closed().await;
        }));

        log::debug!("Simulated location started, {} points", self.track.len());
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            log::debug!("Simulated location stopped");
        }
    }
}

fn track_samples(track: &[Point]) -> Vec<LocationSample> {
    let mut samples: Vec<LocationSample> = track
        .windows(2)
        .map(|pair| LocationSample::new(pair[0]).with_bearing(initial_bearing(pair[0], pair[1])))
        .collect();

    if let Some(&last) = track.last() {
        let sample = LocationSample::new(last);
        samples.push(match samples.last().and_then(|prev| prev.bearing) {
            Some(bearing) => sample.with_bearing(bearing),
            None => sample,
        });
    }

    samples
}

/// Great-circle bearing from `from` to `to` in degrees clockwise from north, in `[0, 360)`.
fn initial_bearing(from: Point, to: Point) -> f64 {
    let (lat1, lat2) = (from.lat().to_radians(), to.lat().to_radians());
    let delta_lon = (to.lon() - from.lon()).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}
