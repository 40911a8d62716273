use std::sync::Arc;

use analysis::cross_section::CrossSectionAnalyzer;
use analysis::request::{CrossSectionRequest, MAX_RADIAL_RANGE_M, ViewshedRequest};
use analysis::viewshed::ViewshedAnalyzer;
use clap::{Parser, Subcommand};
use foundation::math::ProjectedXY;
use formats::geojson::{FeatureCollection, profile_feature, viewshed_feature};
use terrain::TerrainSampler;
use terrain::http::HttpTerrainSource;
use terrain::synthetic::FlatTerrain;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terrain visibility and profile analysis")]
struct Args {
    /// Terrain height endpoint; omit to use flat synthetic terrain
    #[arg(long)]
    terrain_url: Option<String>,

    /// Height of the synthetic terrain used when no endpoint is given
    #[arg(long, default_value_t = 0.0)]
    flat_height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a viewshed and print it as a GeoJSON FeatureCollection
    Viewshed {
        /// Viewpoint, projected Web Mercator meters: x,y
        #[arg(long, value_parser = parse_xy)]
        center: ProjectedXY,

        /// Outer analysis radius in meters (capped at 50 km)
        #[arg(long)]
        radial_max: f64,

        /// Inner analysis radius in meters
        #[arg(long, default_value_t = 0.0)]
        radial_min: f64,

        /// Ring spacing in meters
        #[arg(long)]
        radial_step: f64,

        /// Sightline spacing in degrees
        #[arg(long)]
        azimuth_step: f64,

        /// Azimuth range start, degrees clockwise from north
        #[arg(long, default_value_t = 0.0)]
        azimuth_left: f64,

        /// Azimuth range end, degrees clockwise from north
        #[arg(long, default_value_t = 360.0)]
        azimuth_right: f64,

        /// Eye height above ground in meters
        #[arg(long, default_value_t = 2.0)]
        eye_height: f64,

        /// Terrain detail level
        #[arg(long, default_value_t = 8)]
        level: u32,
    },

    /// Compute a terrain profile and print it as GeoJSON LineStrings
    Profile {
        /// Path start, projected Web Mercator meters: x,y
        #[arg(long, value_parser = parse_xy)]
        from: ProjectedXY,

        /// Path end, projected Web Mercator meters: x,y
        #[arg(long, value_parser = parse_xy)]
        to: ProjectedXY,

        /// Intermediate waypoints, each x,y
        #[arg(long, value_parser = parse_xy)]
        via: Vec<ProjectedXY>,

        /// Sample spacing in meters
        #[arg(long)]
        resolution: f64,

        /// Terrain detail level
        #[arg(long, default_value_t = 8)]
        level: u32,
    },
}

fn parse_xy(s: &str) -> Result<ProjectedXY, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(ProjectedXY::new(x, y))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let sampler: Arc<dyn TerrainSampler> = match &args.terrain_url {
        Some(url) => {
            info!("using terrain endpoint {url}");
            Arc::new(HttpTerrainSource::new(url.clone()))
        }
        None => {
            info!("using flat synthetic terrain at {} m", args.flat_height);
            Arc::new(FlatTerrain::new(args.flat_height))
        }
    };

    match args.command {
        Command::Viewshed {
            center,
            radial_max,
            radial_min,
            radial_step,
            azimuth_step,
            azimuth_left,
            azimuth_right,
            eye_height,
            level,
        } => {
            let request = ViewshedRequest::new(
                center,
                radial_max.min(MAX_RADIAL_RANGE_M),
                radial_step,
                azimuth_step,
            )
            .with_radial_range_min(radial_min)
            .with_azimuth_range(azimuth_left, azimuth_right)
            .with_eye_height(eye_height)
            .with_terrain_level(level);

            let analyzer = ViewshedAnalyzer::new(sampler);
            let regions = analyzer.analyze(&request).await?;
            info!("viewshed produced {} visible regions", regions.len());

            let collection =
                FeatureCollection::new(regions.iter().map(viewshed_feature).collect());
            println!("{}", serde_json::to_string_pretty(&collection)?);
        }
        Command::Profile {
            from,
            to,
            via,
            resolution,
            level,
        } => {
            let request = CrossSectionRequest::new(from, to, resolution)
                .with_via(via)
                .with_terrain_level(level);

            let analyzer = CrossSectionAnalyzer::new(sampler);
            let altitudes = analyzer.analyze(&request).await?;
            info!(
                "profile produced {} segments, {} samples",
                altitudes.len(),
                altitudes.iter().map(Vec::len).sum::<usize>()
            );

            let features = altitudes
                .iter()
                .enumerate()
                .map(|(i, segment)| profile_feature(i, segment))
                .collect();
            println!("{}", serde_json::to_string_pretty(&FeatureCollection::new(features))?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_xy;

    #[test]
    fn parses_projected_pairs() {
        let p = parse_xy("15550408.5,-4257415").unwrap();
        assert_eq!(p.x, 15550408.5);
        assert_eq!(p.y, -4257415.0);
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_xy("12").is_err());
        assert!(parse_xy("a,b").is_err());
    }
}
