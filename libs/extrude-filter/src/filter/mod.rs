//! # Extrude Geometry Filter
//!
//! Turns styled features into bucketed wall and roof meshes.
//!
//! ## Pipeline
//!
//! ```text
//! push(features)
//!   ├─ reset          recompile the style if it changed
//!   ├─ resolve        heights, skins, colors per part (sequential, draws from rng)
//!   ├─ build          extrude → smooth walls → tessellate roof (optionally on rayon)
//!   ├─ bucket         walls by skin, roofs untextured (sequential, feature order)
//!   └─ consolidate    one mesh per bucket when merging
//! ```
//!
//! Only the build phase runs in parallel, so a seeded run produces the same
//! group whether or not `ExtrudeConfig::parallel` is set.


use crate::bucket::{StateBuckets, StateKey};
use crate::compiled::CompiledStyle;
use crate::diagnostic::Diagnostics;
use crate::error::FilterError;
use crate::expression::StringExpression;
use crate::feature::Feature;
use crate::localize::{Geocentric, Localizer};
use crate::output::ExtrudedGroup;
use crate::resource::{ResourceLibrary, SkinResource};
use crate::style::{SkinSymbol, Style, StyleSheet};
use config::constants::{ExtrudeConfig, DEFAULT_RNG_SEED};
use extrude_mesh::ops::{
    apparent_rotation, extrude, outer_loop, roof_texcoords, smooth_creases, tessellate_outline,
    ExtrudeOptions, ExtrudeParams, RenderFrame, TextureParams,
};
use extrude_mesh::{Contour, ElevationRange, Mesh, MeshError, Outline};
use glam::DVec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::fmt;

/// Resolves a feature's extrusion height, overriding the style.
pub type HeightCallback = Box<dyn Fn(&dyn Feature) -> f64 + Send + Sync>;

/// Creates the deterministic generator used for skin selection.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// [`seeded_rng`] with the default seed.
pub fn default_rng() -> ChaCha8Rng {
    seeded_rng(DEFAULT_RNG_SEED)
}

/// Session state a run reads but does not own.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterContext<'a> {
    /// Styles referenced by name and resource libraries
    pub styles: Option<&'a StyleSheet>,
    /// Target frame when the scene is geocentric
    pub geocentric: Option<Geocentric<'a>>,
}

impl<'a> FilterContext<'a> {
    /// A context with a style sheet.
    pub fn with_styles(styles: &'a StyleSheet) -> Self {
        Self {
            styles: Some(styles),
            geocentric: None,
        }
    }

    /// Adds a geocentric target frame.
    pub fn geocentric(mut self, target: Geocentric<'a>) -> Self {
        self.geocentric = Some(target);
        self
    }
}

struct CachedStyle {
    version: u64,
    result: Result<CompiledStyle, FilterError>,
}

/// Extrudes polygon and line features into 3D walls with roofs.
pub struct ExtrudeGeometryFilter {
    style: Style,
    style_version: u64,
    compiled: Option<CachedStyle>,
    compilations: usize,
    height_callback: Option<HeightCallback>,
    feature_name: Option<StringExpression>,
    config: ExtrudeConfig,
}

impl Default for ExtrudeGeometryFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExtrudeGeometryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtrudeGeometryFilter")
            .field("style", &self.style.name)
            .field("style_version", &self.style_version)
            .field("height_callback", &self.height_callback.is_some())
            .field("feature_name", &self.feature_name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ExtrudeGeometryFilter {
    /// Creates a filter with an empty style and default configuration.
    pub fn new() -> Self {
        Self {
            style: Style::default(),
            style_version: 0,
            compiled: None,
            compilations: 0,
            height_callback: None,
            feature_name: None,
            config: ExtrudeConfig::default(),
        }
    }

    /// Sets the style. The next run recompiles only if it differs from the
    /// current one.
    pub fn set_style(&mut self, style: Style) {
        if style != self.style {
            self.style = style;
            self.style_version += 1;
        }
    }

    /// The current style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Overrides the style height.
    pub fn set_height_callback(&mut self, callback: Option<HeightCallback>) {
        self.height_callback = callback;
    }

    /// Names every produced mesh; disables consolidation.
    pub fn set_feature_name(&mut self, expression: Option<StringExpression>) {
        self.feature_name = expression;
    }

    /// Replaces the runtime configuration.
    pub fn set_config(&mut self, config: ExtrudeConfig) {
        if config != self.config {
            self.config = config;
            self.style_version += 1;
        }
    }

    /// The runtime configuration.
    pub fn config(&self) -> &ExtrudeConfig {
        &self.config
    }

    /// How many times the style has been compiled.
    pub fn compilations(&self) -> usize {
        self.compilations
    }

    /// Recompiles the style if it changed since the last reset.
    pub fn reset(&mut self, ctx: &FilterContext<'_>) {
        let fresh = self
            .compiled
            .as_ref()
            .is_some_and(|c| c.version == self.style_version);
        if fresh {
            return;
        }
        let result = CompiledStyle::compile(&self.style, ctx.styles, &self.config);
        self.compilations += 1;
        tracing::debug!(
            style = %self.style.name,
            version = self.style_version,
            ok = result.is_ok(),
            "compiled extrusion style"
        );
        self.compiled = Some(CachedStyle {
            version: self.style_version,
            result,
        });
    }

    /// Extrudes `features` into a new group.
    ///
    /// Never fails: problems are recorded as diagnostics and the affected
    /// output is degraded or omitted.
    pub fn push<F: Feature, R: Rng + ?Sized>(
        &mut self,
        features: &[F],
        ctx: &FilterContext<'_>,
        rng: &mut R,
    ) -> ExtrudedGroup {
        let span = tracing::info_span!("extrude_push", features = features.len());
        let _enter = span.enter();

        self.reset(ctx);
        let mut diagnostics = Diagnostics::new();

        let compiled = match self.compiled.as_ref().map(|c| &c.result) {
            Some(Ok(compiled)) => compiled,
            Some(Err(err)) => {
                diagnostics.warn(err.clone());
                return ExtrudedGroup::empty(diagnostics);
            }
            None => return ExtrudedGroup::empty(diagnostics),
        };

        let mut missing = Vec::new();
        let wall_library = resolve_library(compiled.wall_skin.as_ref(), ctx, &mut missing);
        let roof_library = resolve_library(compiled.roof_skin.as_ref(), ctx, &mut missing);
        missing.dedup();
        for name in missing {
            diagnostics.warn(FilterError::library_not_found(name));
        }
        let localizer = ctx.geocentric.map(Localizer::new);
        let frame = localizer.as_ref().map(|l| l as &dyn RenderFrame);

        let resolver = Resolver {
            compiled,
            wall_library,
            roof_library,
            height_callback: self.height_callback.as_ref(),
            feature_name: self.feature_name.as_ref(),
        };
        let mut jobs = Vec::new();
        for feature in features {
            resolver.resolve(feature, rng, &mut jobs, &mut diagnostics);
        }

        let outputs: Vec<Result<Option<PartOutput>, MeshError>> = if self.config.parallel {
            jobs.par_iter().map(|job| build_part(job, compiled, frame)).collect()
        } else {
            jobs.iter().map(|job| build_part(job, compiled, frame)).collect()
        };

        let mut buckets = StateBuckets::new();
        for (job, output) in jobs.iter().zip(outputs) {
            let output = match output {
                Ok(Some(output)) => output,
                Ok(None) => continue,
                Err(source) => {
                    diagnostics.warn(FilterError::Walls {
                        feature: job.feature_id,
                        source,
                    });
                    continue;
                }
            };
            let key = job.wall_skin.map_or(StateKey::Untextured, SkinResource::state_key);
            buckets.push(key, job.wall_skin, output.walls);
            match output.roof {
                Ok(Some(roof)) => buckets.push(StateKey::Untextured, None, roof),
                Ok(None) => {}
                Err(source) => diagnostics.warn(FilterError::Roof {
                    feature: job.feature_id,
                    source,
                }),
            }
        }

        if self.config.merge_geometry && self.feature_name.is_none() {
            for bucket in buckets.iter_mut() {
                if let Err(source) = bucket.consolidate() {
                    diagnostics.warn(FilterError::Consolidate {
                        bucket: bucket.key.clone(),
                        source,
                    });
                }
            }
        }

        tracing::info!("Sorted geometry into {} groups", buckets.len());

        ExtrudedGroup {
            buckets: buckets.drain(),
            delocalize: localizer.as_ref().map(Localizer::delocalize),
            diagnostics: diagnostics.into_vec(),
        }
    }
}

/// Looks up the library a skin symbol names, recording the name when the
/// style sheet lacks it.
fn resolve_library<'s>(
    skin: Option<&SkinSymbol>,
    ctx: &FilterContext<'s>,
    missing: &mut Vec<String>,
) -> Option<&'s ResourceLibrary> {
    let name = skin?.library.as_deref()?;
    let library = ctx.styles.and_then(|sheet| sheet.get_library(name));
    if library.is_none() {
        missing.push(name.to_string());
    }
    library
}

// =============================================================================
// PHASE 1: RESOLVE
// =============================================================================

/// Everything needed to build one part, resolved up front.
struct PartJob<'s> {
    feature_id: u64,
    contours: Vec<Contour>,
    range: ElevationRange,
    params: ExtrudeParams,
    texture: TextureParams,
    wall_skin: Option<&'s SkinResource>,
    roof_skin: Option<&'s SkinResource>,
    roof: bool,
    name: Option<String>,
}

struct Resolver<'s> {
    compiled: &'s CompiledStyle,
    wall_library: Option<&'s ResourceLibrary>,
    roof_library: Option<&'s ResourceLibrary>,
    height_callback: Option<&'s HeightCallback>,
    feature_name: Option<&'s StringExpression>,
}

impl<'s> Resolver<'s> {
    fn resolve<F: Feature, R: Rng + ?Sized>(
        &self,
        feature: &F,
        rng: &mut R,
        jobs: &mut Vec<PartJob<'s>>,
        diagnostics: &mut Diagnostics,
    ) {
        let geometry = feature.geometry();
        let Some(range) = ElevationRange::of(&geometry.contours()) else {
            tracing::debug!(feature = feature.id(), "skipping feature without points");
            return;
        };

        let height = self.height(feature, diagnostics);
        let height_offset = self
            .compiled
            .height_offset_expression
            .as_ref()
            .map_or(0.0, |expr| {
                feature.eval(expr).unwrap_or_else(|err| {
                    diagnostics.warn(FilterError::expression(feature.id(), "height offset", err));
                    0.0
                })
            });
        let params = ExtrudeParams {
            height,
            height_offset,
            flatten: self.compiled.flatten,
        };
        let name = self.feature_name.map(|expr| feature.eval_string(expr));

        for part in geometry.parts() {
            let wall_skin = choose_skin(
                self.wall_library,
                self.compiled.wall_skin.as_ref(),
                Some(height),
                rng,
            );
            let roof_skin = choose_skin(
                self.roof_library,
                self.compiled.roof_skin.as_ref(),
                None,
                rng,
            );
            let texture = wall_skin.map_or_else(
                || TextureParams::untextured(self.compiled.wall_fill),
                |skin| skin.texture_params(self.compiled.wall_fill),
            );
            jobs.push(PartJob {
                feature_id: feature.id(),
                contours: part.contours(),
                range,
                params,
                texture,
                wall_skin,
                roof_skin,
                roof: part.is_polygon(),
                name: name.clone(),
            });
        }
    }

    /// Height callback, then height expression, then fixed height.
    fn height<F: Feature>(&self, feature: &F, diagnostics: &mut Diagnostics) -> f64 {
        if let Some(callback) = self.height_callback {
            return callback(feature);
        }
        match &self.compiled.height_expression {
            Some(expr) => feature.eval(expr).unwrap_or_else(|err| {
                diagnostics.warn(FilterError::expression(feature.id(), "height", err));
                0.0
            }),
            None => self.compiled.height,
        }
    }
}

/// Queries `library` with `symbol`, picking uniformly among several matches.
pub(crate) fn choose_skin<'s, R: Rng + ?Sized>(
    library: Option<&'s ResourceLibrary>,
    symbol: Option<&SkinSymbol>,
    object_height: Option<f64>,
    rng: &mut R,
) -> Option<&'s SkinResource> {
    let (library, symbol) = library.zip(symbol)?;
    let query = SkinSymbol {
        object_height,
        ..symbol.clone()
    };
    let candidates = library.get_skins(&query);
    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        n => Some(candidates[rng.gen_range(0..n)]),
    }
}

// =============================================================================
// PHASE 2: BUILD
// =============================================================================

struct PartOutput {
    walls: Mesh,
    roof: Result<Option<Mesh>, MeshError>,
}

/// Builds one part. `Ok(None)` when the part had no points; an error means
/// the walls could not be built.
fn build_part(
    job: &PartJob<'_>,
    compiled: &CompiledStyle,
    frame: Option<&dyn RenderFrame>,
) -> Result<Option<PartOutput>, MeshError> {
    let options = ExtrudeOptions {
        roof: job.roof.then_some(compiled.roof_fill),
        base: None,
        frame,
    };
    let extrusion = extrude(&job.contours, job.range, &job.params, &job.texture, &options)?;
    if !extrusion.made_geometry {
        return Ok(None);
    }

    let mut walls = extrusion.walls;
    smooth_creases(&mut walls, compiled.cos_wall_angle_threshold)?;
    if let Some(name) = &job.name {
        walls.set_name(name.clone());
    }

    let roof = match extrusion.roof {
        Some(outline) => build_roof(&outline, job, compiled),
        None => Ok(None),
    };
    Ok(Some(PartOutput { walls, roof }))
}

fn build_roof(
    outline: &Outline,
    job: &PartJob<'_>,
    compiled: &CompiledStyle,
) -> Result<Option<Mesh>, MeshError> {
    let mut roof = tessellate_outline(outline, DVec3::Z)?;
    if roof.is_empty() {
        return Ok(None);
    }
    if let Some(skin) = job.roof_skin {
        let rotation = outer_loop(outline).map_or(0.0, apparent_rotation);
        let texcoords =
            roof_texcoords(roof.vertices(), rotation, skin.image_width, skin.image_height);
        roof.set_texcoords(texcoords);
    }
    smooth_creases(&mut roof, compiled.cos_roof_angle_threshold)?;
    if let Some(name) = &job.name {
        roof.set_name(name.clone());
    }
    Ok(Some(roof))
}
