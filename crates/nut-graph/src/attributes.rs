//! Configuration attributes.
//!
//! The widget exposes five observable attributes: `x`, `y`, `scale`,
//! `rankdir` and `align`. The [`ViewportState`] is authoritative; the
//! attribute values are a mirror of it. [`AttributeSynchronizer`] parses
//! external writes into state changes and writes state changes back into
//! the mirror, touching only values that actually differ so a reflected
//! value never looks like a new external write.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use log::{debug, trace, warn};

use nut_graph_core::{
    direction::{Align, RankDir},
    geometry::Point,
};

use crate::{
    error::AttributeError,
    viewport::{ViewportController, ViewportState},
};

/// A configuration attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    X,
    Y,
    Scale,
    RankDir,
    Align,
}

impl AttributeKey {
    pub const ALL: [AttributeKey; 5] = [Self::X, Self::Y, Self::Scale, Self::RankDir, Self::Align];

    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Scale => "scale",
            Self::RankDir => "rankdir",
            Self::Align => "align",
        }
    }
}

impl FromStr for AttributeKey {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| AttributeError::UnknownKey(name.to_string()))
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an accepted attribute write requires of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeEffect {
    /// Nothing changed.
    None,
    /// Pan or zoom changed; update the transform only.
    Transform,
    /// Orientation changed; schedule a re-layout.
    Relayout,
}

/// Keeps the attribute mirror and the viewport state in agreement.
#[derive(Debug, Clone, Default)]
pub struct AttributeSynchronizer {
    mirror: IndexMap<AttributeKey, String>,
}

impl AttributeSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mirrored value of an attribute.
    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        self.mirror.get(&key).map(String::as_str)
    }

    /// Builds the initial state from the attributes present at attach time.
    /// Missing or invalid values fall back to `x=0 y=0 scale=1 rankdir=TB`
    /// and no alignment. Unknown names are ignored.
    pub fn initial_state<'a>(
        &mut self,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> ViewportState {
        let mut position = Point::default();
        let mut scale = 1.0;
        let mut rankdir = RankDir::default();
        let mut align = None;

        for (name, value) in attributes {
            let Ok(key) = name.parse::<AttributeKey>() else {
                trace!(name = name; "Ignoring unknown root attribute");
                continue;
            };

            let parsed = match key {
                AttributeKey::X => number(key, value).map(|x| position = position.with_x(x)),
                AttributeKey::Y => number(key, value).map(|y| position = position.with_y(y)),
                AttributeKey::Scale => number(key, value).map(|s| scale = s),
                AttributeKey::RankDir => parse_rankdir(value).map(|r| rankdir = r),
                AttributeKey::Align => parse_align(value).map(|a| align = Some(a)),
            };
            if let Err(err) = parsed {
                warn!(attribute:% = key, value = value, err:% = err; "Invalid initial attribute, using default");
            }
        }

        let state = ViewportState::new(position, scale, rankdir, align);
        self.reflect(&state);
        state
    }

    /// Applies an external write (`None` removes the attribute).
    ///
    /// Removing `x`, `y` or `scale` keeps the current value; removing
    /// `rankdir` or `align` resets it to its default.
    ///
    /// # Errors
    ///
    /// Rejects unknown names, non-finite numbers and unrecognized enum
    /// values. The state is left unchanged and the mirror shows the
    /// retained value again.
    pub fn apply(
        &mut self,
        controller: &mut ViewportController,
        name: &str,
        value: Option<&str>,
    ) -> Result<AttributeEffect, AttributeError> {
        let key: AttributeKey = name.parse()?;
        match value {
            Some(value) => {
                self.mirror.insert(key, value.to_string());
            }
            None => {
                self.mirror.shift_remove(&key);
            }
        }

        let result = Self::update(controller, key, value);
        let writes = self.reflect(controller.state());

        match &result {
            Ok(effect) => debug!(attribute:% = key, effect:? = effect, writes = writes; "Applied attribute"),
            Err(err) => warn!(attribute:% = key, err:% = err; "Rejected attribute value"),
        }
        result
    }

    fn update(
        controller: &mut ViewportController,
        key: AttributeKey,
        value: Option<&str>,
    ) -> Result<AttributeEffect, AttributeError> {
        let state = *controller.state();

        let effect = match (key, value) {
            (AttributeKey::X | AttributeKey::Y | AttributeKey::Scale, None) => {
                AttributeEffect::None
            }
            (AttributeKey::X, Some(value)) => {
                let x = number(key, value)?;
                controller.set_state(state.with_position(state.position().with_x(x)));
                transform_effect(&state, controller.state())
            }
            (AttributeKey::Y, Some(value)) => {
                let y = number(key, value)?;
                controller.set_state(state.with_position(state.position().with_y(y)));
                transform_effect(&state, controller.state())
            }
            (AttributeKey::Scale, Some(value)) => {
                let scale = number(key, value)?;
                controller.zoom(scale, controller.client_center());
                transform_effect(&state, controller.state())
            }
            (AttributeKey::RankDir, value) => {
                let rankdir = value.map(parse_rankdir).transpose()?.unwrap_or_default();
                controller.set_orientation(rankdir, state.align());
                orientation_effect(&state, controller.state())
            }
            (AttributeKey::Align, value) => {
                let align = value.map(parse_align).transpose()?;
                controller.set_orientation(state.rankdir(), align);
                orientation_effect(&state, controller.state())
            }
        };
        Ok(effect)
    }

    /// Writes the state into the mirror. Only differing values are written.
    /// Returns the number of writes.
    pub fn reflect(&mut self, state: &ViewportState) -> usize {
        let values = [
            (AttributeKey::X, Some(state.position().x().to_string())),
            (AttributeKey::Y, Some(state.position().y().to_string())),
            (AttributeKey::Scale, Some(state.scale().to_string())),
            (AttributeKey::RankDir, Some(state.rankdir().to_string())),
            (AttributeKey::Align, state.align().map(|align| align.to_string())),
        ];

        let mut writes = 0;
        for (key, value) in values {
            match value {
                Some(value) if self.get(key) != Some(value.as_str()) => {
                    self.mirror.insert(key, value);
                    writes += 1;
                }
                None if self.mirror.shift_remove(&key).is_some() => writes += 1,
                _ => {}
            }
        }
        writes
    }
}

/// Checks `value` for `key` without applying it.
///
/// # Errors
///
/// Same rejections as [`AttributeSynchronizer::apply`].
pub fn validate(key: AttributeKey, value: &str) -> Result<(), AttributeError> {
    match key {
        AttributeKey::X | AttributeKey::Y | AttributeKey::Scale => number(key, value).map(drop),
        AttributeKey::RankDir => parse_rankdir(value).map(drop),
        AttributeKey::Align => parse_align(value).map(drop),
    }
}

fn number(key: AttributeKey, value: &str) -> Result<f32, AttributeError> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| AttributeError::InvalidNumber {
            name: key.name().to_string(),
            value: value.to_string(),
        })
}

fn parse_rankdir(value: &str) -> Result<RankDir, AttributeError> {
    value
        .parse()
        .map_err(|_| AttributeError::InvalidRankDir(value.to_string()))
}

fn parse_align(value: &str) -> Result<Align, AttributeError> {
    value
        .parse()
        .map_err(|_| AttributeError::InvalidAlign(value.to_string()))
}

fn transform_effect(before: &ViewportState, after: &ViewportState) -> AttributeEffect {
    if before.position() == after.position() && before.scale() == after.scale() {
        AttributeEffect::None
    } else {
        AttributeEffect::Transform
    }
}

fn orientation_effect(before: &ViewportState, after: &ViewportState) -> AttributeEffect {
    if before.rankdir() == after.rankdir() && before.align() == after.align() {
        AttributeEffect::None
    } else {
        AttributeEffect::Relayout
    }
}

#[cfg(test)]
mod tests {
    use nut_graph_core::geometry::Size;

    use super::*;

    fn setup(attributes: &[(&str, &str)]) -> (AttributeSynchronizer, ViewportController) {
        let mut sync = AttributeSynchronizer::new();
        let state = sync.initial_state(attributes.iter().copied());
        (sync, ViewportController::new(state, 0.1))
    }

    #[test]
    fn test_initial_state_defaults_and_fallbacks() {
        let (sync, controller) = setup(&[
            ("X", "12.5"),
            ("y", "oops"),
            ("scale", "0"),
            ("rankdir", "lr"),
            ("align", "middle"),
            ("title", "ignored"),
        ]);

        let state = controller.state();
        assert_eq!(state.position(), Point::new(12.5, 0.0));
        assert_eq!(state.scale(), 0.1);
        assert_eq!(state.rankdir(), RankDir::LR);
        assert_eq!(state.align(), None);

        assert_eq!(sync.get(AttributeKey::Y), Some("0"));
        assert_eq!(sync.get(AttributeKey::RankDir), Some("LR"));
        assert_eq!(sync.get(AttributeKey::Align), None);
    }

    #[test]
    fn test_position_writes_update_transform_only() {
        let (mut sync, mut controller) = setup(&[]);

        let effect = sync.apply(&mut controller, "x", Some(" 40 ")).expect("valid");
        assert_eq!(effect, AttributeEffect::Transform);
        assert_eq!(controller.state().position(), Point::new(40.0, 0.0));
        assert_eq!(sync.get(AttributeKey::X), Some("40"));

        let effect = sync.apply(&mut controller, "x", Some("40.0")).expect("valid");
        assert_eq!(effect, AttributeEffect::None);
        assert_eq!(sync.get(AttributeKey::X), Some("40"));
    }

    #[test]
    fn test_non_numeric_write_is_rejected_and_retained() {
        let (mut sync, mut controller) = setup(&[("y", "7")]);

        for bad in ["abc", "", "NaN", "inf"] {
            let err = sync.apply(&mut controller, "y", Some(bad)).expect_err("rejected");
            assert!(matches!(err, AttributeError::InvalidNumber { .. }));
        }
        assert_eq!(controller.state().position().y(), 7.0);
        assert_eq!(sync.get(AttributeKey::Y), Some("7"));
    }

    #[test]
    fn test_scale_write_zooms_around_client_center() {
        let (mut sync, mut controller) = setup(&[]);
        controller.set_client_size(Size::new(200.0, 100.0));

        sync.apply(&mut controller, "scale", Some("2")).expect("valid");
        assert_eq!(controller.state().scale(), 2.0);
        assert_eq!(controller.state().position(), Point::new(100.0, 50.0));

        sync.apply(&mut controller, "scale", Some("-5")).expect("clamped");
        assert_eq!(controller.state().scale(), 0.1);
        assert_eq!(sync.get(AttributeKey::Scale), Some("0.1"));
    }

    #[test]
    fn test_unrecognized_rankdir_keeps_previous() {
        let (mut sync, mut controller) = setup(&[("rankdir", "BT")]);

        let err = sync
            .apply(&mut controller, "rankdir", Some("XX"))
            .expect_err("rejected");
        assert_eq!(err, AttributeError::InvalidRankDir("XX".to_string()));
        assert_eq!(controller.state().rankdir(), RankDir::BT);
        assert_eq!(sync.get(AttributeKey::RankDir), Some("BT"));
    }

    #[test]
    fn test_orientation_writes_relayout_without_resetting_pan() {
        let (mut sync, mut controller) = setup(&[("x", "30"), ("y", "40")]);

        let effect = sync.apply(&mut controller, "RankDir", Some("rl")).expect("valid");
        assert_eq!(effect, AttributeEffect::Relayout);
        assert_eq!(controller.state().position(), Point::new(30.0, 40.0));
        assert_eq!(sync.get(AttributeKey::RankDir), Some("RL"));

        let effect = sync.apply(&mut controller, "align", Some("ur")).expect("valid");
        assert_eq!(effect, AttributeEffect::Relayout);
        assert_eq!(controller.state().align(), Some(Align::UR));

        let effect = sync.apply(&mut controller, "align", None).expect("removal");
        assert_eq!(effect, AttributeEffect::Relayout);
        assert_eq!(controller.state().align(), None);
        assert_eq!(sync.get(AttributeKey::Align), None);

        let effect = sync.apply(&mut controller, "rankdir", None).expect("removal");
        assert_eq!(effect, AttributeEffect::Relayout);
        assert_eq!(controller.state().rankdir(), RankDir::TB);
    }

    #[test]
    fn test_removing_numeric_attribute_keeps_value() {
        let (mut sync, mut controller) = setup(&[("x", "5")]);

        let effect = sync.apply(&mut controller, "x", None).expect("removal");
        assert_eq!(effect, AttributeEffect::None);
        assert_eq!(controller.state().position().x(), 5.0);
        assert_eq!(sync.get(AttributeKey::X), Some("5"));
    }

    #[test]
    fn test_unknown_key() {
        let (mut sync, mut controller) = setup(&[]);
        assert_eq!(
            sync.apply(&mut controller, "zoom", Some("2")),
            Err(AttributeError::UnknownKey("zoom".to_string()))
        );
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate(AttributeKey::Scale, "2.5"), Ok(()));
        assert_eq!(validate(AttributeKey::Align, "dl"), Ok(()));
        assert_eq!(
            validate(AttributeKey::RankDir, "XX"),
            Err(AttributeError::InvalidRankDir("XX".to_string()))
        );
        assert!(validate(AttributeKey::X, "left").is_err());
    }

    #[test]
    fn test_reflect_writes_only_differences() {
        let (mut sync, mut controller) = setup(&[]);
        assert_eq!(sync.reflect(controller.state()), 0);

        controller.pan(3.0, 0.0);
        assert_eq!(sync.reflect(controller.state()), 1);
        assert_eq!(sync.reflect(controller.state()), 0);
    }
}
