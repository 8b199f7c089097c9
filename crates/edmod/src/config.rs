use clap::Args;
use modkit_common::{Rgb, Units};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::editor::{ColorEdit, FieldEdits};
use crate::error::{EditError, Result};
use crate::filter::{Bound, GeometricBounds};
use crate::pruner::{RemovalRule, RemovalScope};
use crate::selector::ObjectSelection;
use ascii_model::ObjectType;

/// Every option the object editor understands.
///
/// The same bag is filled from the command line and from profile files; it
/// is validated once into an [`EditConfig`].
#[derive(Debug, Clone, Default, PartialEq, Args, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct EditOptions {
    /// Color to change, given as R,G,B values ranging from 0-1
    #[arg(long, value_name = "R,G,B")]
    pub colorin: Option<String>,

    /// Object name to change
    #[arg(long, value_name = "NAME")]
    pub namein: Option<String>,

    /// List of objects to operate on. Objects are separated by commas or by
    /// dashes for multiple selections
    #[arg(long, value_name = "LIST")]
    pub objects: Option<String>,

    /// Color to change to, given as R,G,B values ranging from 0-1, or 'rand'
    /// to generate random colors
    #[arg(long, value_name = "R,G,B")]
    pub colorout: Option<String>,

    /// Object name to change to
    #[arg(long, value_name = "NAME")]
    pub nameout: Option<String>,

    /// Line width to change to
    #[arg(long, value_name = "INT")]
    pub linewidth: Option<u32>,

    /// Set objects to filled. This is most useful for scattered point objects
    #[arg(long)]
    pub filled: bool,

    /// Set objects to not filled
    #[arg(long)]
    pub notfilled: bool,

    /// Point size to change to
    #[arg(long, value_name = "INT")]
    pub pointsize: Option<u32>,

    /// Transparency of the object (in %, where 0 = opaque)
    #[arg(long, value_name = "INT")]
    pub transparency: Option<u32>,

    /// Remove objects with volumes less than this
    #[arg(long, value_name = "FLOAT")]
    pub vlow: Option<f64>,

    /// Remove objects with volumes greater than this
    #[arg(long, value_name = "FLOAT")]
    pub vhigh: Option<f64>,

    /// Remove objects with surface areas less than this
    #[arg(long, value_name = "FLOAT")]
    pub slow: Option<f64>,

    /// Remove objects with surface areas greater than this
    #[arg(long, value_name = "FLOAT")]
    pub shigh: Option<f64>,

    /// Remove objects with a sphericity less than this. Sphericity ranges
    /// from 0 to 1, where 1 is a perfect sphere
    #[arg(long, value_name = "FLOAT")]
    pub sphericitylow: Option<f64>,

    /// Remove objects with a sphericity greater than this
    #[arg(long, value_name = "FLOAT")]
    pub sphericityhigh: Option<f64>,

    /// Units for the volume and surface area cutoffs: pix, nm or um.
    /// Defaults to the model header units
    #[arg(long, value_name = "STR")]
    pub units: Option<String>,

    /// Remove all objects that have a number of contours less than or equal
    /// to this value
    #[arg(long, value_name = "INT")]
    pub rmbycont: Option<usize>,

    /// Remove all contours that have a number of points less than or equal
    /// to this value
    #[arg(long, value_name = "INT")]
    pub rmbypoint: Option<usize>,

    /// Remove all objects that don't contain any contours
    #[arg(long)]
    pub rmempty: bool,

    /// Apply --rmbycont or --rmempty across the whole model file, independent
    /// of --objects, --colorin and --namein
    #[arg(long)]
    pub rmall: bool,

    /// Ignore scattered objects
    #[arg(long)]
    pub ignorescattered: bool,

    /// Ignore open objects
    #[arg(long)]
    pub ignoreopen: bool,

    /// Ignore closed objects
    #[arg(long)]
    pub ignoreclosed: bool,

    /// Change the values for all objects in one pass over the whole model
    #[arg(long)]
    pub all: bool,

    /// Seed for random colors
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}

impl EditOptions {
    /// Fill every option not set here from `base`
    pub fn overlay(self, base: EditOptions) -> EditOptions {
        EditOptions {
            colorin: self.colorin.or(base.colorin),
            namein: self.namein.or(base.namein),
            objects: self.objects.or(base.objects),
            colorout: self.colorout.or(base.colorout),
            nameout: self.nameout.or(base.nameout),
            linewidth: self.linewidth.or(base.linewidth),
            filled: self.filled || base.filled,
            notfilled: self.notfilled || base.notfilled,
            pointsize: self.pointsize.or(base.pointsize),
            transparency: self.transparency.or(base.transparency),
            vlow: self.vlow.or(base.vlow),
            vhigh: self.vhigh.or(base.vhigh),
            slow: self.slow.or(base.slow),
            shigh: self.shigh.or(base.shigh),
            sphericitylow: self.sphericitylow.or(base.sphericitylow),
            sphericityhigh: self.sphericityhigh.or(base.sphericityhigh),
            units: self.units.or(base.units),
            rmbycont: self.rmbycont.or(base.rmbycont),
            rmbypoint: self.rmbypoint.or(base.rmbypoint),
            rmempty: self.rmempty || base.rmempty,
            rmall: self.rmall || base.rmall,
            ignorescattered: self.ignorescattered || base.ignorescattered,
            ignoreopen: self.ignoreopen || base.ignoreopen,
            ignoreclosed: self.ignoreclosed || base.ignoreclosed,
            all: self.all || base.all,
            seed: self.seed.or(base.seed),
        }
    }

    /// Check option combinations and values, producing the run configuration
    pub fn validate(&self) -> Result<EditConfig> {
        if self.rmbycont.is_some() && self.rmempty {
            return Err(EditError::usage(
                "The option --rmbycont is incompatible with the option --rmempty",
            ));
        }
        if self.rmall && self.rmbycont.is_none() && !self.rmempty {
            return Err(EditError::usage(
                "The option --rmall requires either --rmbycont or --rmempty.",
            ));
        }
        if self.filled && self.notfilled {
            return Err(EditError::usage(
                "The option --filled is incompatible with the option --notfilled",
            ));
        }
        if self.transparency.is_some_and(|t| t > 100) {
            return Err(EditError::usage("--transparency must be between 0 and 100"));
        }

        let match_color = match self.colorin.as_deref() {
            Some(input) => match ColorEdit::parse(input)? {
                ColorEdit::Fixed(rgb) => Some(rgb),
                ColorEdit::Random => {
                    return Err(EditError::usage("Input to --colorin must be specified as R,G,B."));
                }
            },
            None => None,
        };

        let edits = FieldEdits {
            name: self.nameout.clone(),
            color: self.colorout.as_deref().map(ColorEdit::parse).transpose()?,
            transparency: self.transparency,
            line_width: self.linewidth,
            fill: match (self.filled, self.notfilled) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            point_size: self.pointsize,
        };

        let bounds = GeometricBounds {
            volume: Bound::new(self.vlow, self.vhigh),
            area: Bound::new(self.slow, self.shigh),
            sphericity: Bound::new(self.sphericitylow, self.sphericityhigh),
            units: self.units.as_deref().map(Units::parse).transpose()?,
        };

        let removal = match (self.rmbycont, self.rmempty) {
            (Some(limit), _) => Some(RemovalRule::AtMostContours(limit)),
            (None, true) => Some(RemovalRule::Empty),
            (None, false) => None,
        };

        let ignore = IgnoredTypes {
            // scattered objects have no volume to filter on
            scattered: self.ignorescattered || bounds.is_active(),
            open: self.ignoreopen,
            closed: self.ignoreclosed,
        };

        Ok(EditConfig {
            selection: self.objects.as_deref().map(ObjectSelection::parse).transpose()?,
            match_color,
            match_name: self.namein.clone(),
            edits,
            bounds,
            removal,
            removal_scope: if self.rmall {
                RemovalScope::AllObjects
            } else {
                RemovalScope::Selected
            },
            min_points: self.rmbypoint,
            ignore,
            whole_file: self.all,
            seed: self.seed,
        })
    }
}

/// Object types that pass through a run untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IgnoredTypes {
    pub closed: bool,
    pub open: bool,
    pub scattered: bool,
}

impl IgnoredTypes {
    pub fn any(&self) -> bool {
        self.closed || self.open || self.scattered
    }

    pub fn contains(&self, object_type: ObjectType) -> bool {
        match object_type {
            ObjectType::Closed => self.closed,
            ObjectType::Open => self.open,
            ObjectType::Scattered => self.scattered,
        }
    }
}

/// Validated, immutable configuration of one editor run
#[derive(Debug, Clone, PartialEq)]
pub struct EditConfig {
    pub selection: Option<ObjectSelection>,
    pub match_color: Option<Rgb>,
    pub match_name: Option<String>,
    pub edits: FieldEdits,
    pub bounds: GeometricBounds,
    pub removal: Option<RemovalRule>,
    pub removal_scope: RemovalScope,
    /// Contours with at most this many points are removed
    pub min_points: Option<usize>,
    pub ignore: IgnoredTypes,
    /// Edit the whole model in one pass, skipping per-object processing
    pub whole_file: bool,
    pub seed: Option<u64>,
}

impl EditConfig {
    /// Whether anything besides field edits was requested
    pub fn filters_objects(&self) -> bool {
        self.selection.is_some()
            || self.match_color.is_some()
            || self.match_name.is_some()
            || self.bounds.is_active()
            || self.removal.is_some()
            || self.min_points.is_some()
            || self.ignore.any()
    }

    pub fn matches_identity(&self) -> bool {
        self.match_color.is_some() || self.match_name.is_some()
    }
}
