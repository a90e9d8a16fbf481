//! Stamping toolpath generation
//!
//! Walks grouped placements and emits the motion program: a header, then per
//! tool an install pause followed by ink and stamp moves, then the end block.
//! Every move is a rapid (`G0`) since the head only travels between presses.

use crate::grouping::GlyphGroups;
use crate::machine::MachineProfile;
use rand::Rng;
use stampkit_core::units::format_mm;
use stampkit_core::Placement;
use std::fmt;
use tracing::{debug, info};

/// One line of a motion program
#[derive(Debug, Clone, PartialEq)]
pub enum MotionCommand {
    /// Parenthesised comment
    Comment(String),
    /// G90
    Absolute,
    /// G0 X Y
    Rapid { x: f64, y: f64 },
    /// G0 Z
    RapidZ(f64),
    /// M0, wait for the operator
    Pause,
    /// M5
    ToolOff,
    /// M2
    ProgramEnd,
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(text) => write!(f, "( {} )", text),
            Self::Absolute => write!(f, "G90"),
            Self::Rapid { x, y } => write!(f, "G0 X{} Y{}", format_mm(*x), format_mm(*y)),
            Self::RapidZ(z) => write!(f, "G0 Z{}", format_mm(*z)),
            Self::Pause => write!(f, "M0"),
            Self::ToolOff => write!(f, "M5"),
            Self::ProgramEnd => write!(f, "M2"),
        }
    }
}

/// An append-only motion program
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MotionScript {
    commands: Vec<MotionCommand>,
}

impl MotionScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: MotionCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[MotionCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of lines that are the given comment
    pub fn count_comments(&self, text: &str) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, MotionCommand::Comment(t) if t == text))
            .count()
    }

    /// Render as text, one command per line
    pub fn to_gcode(&self) -> String {
        let mut gcode = String::new();
        for command in &self.commands {
            gcode.push_str(&command.to_string());
            gcode.push('\n');
        }
        gcode
    }
}

/// Order in which tools are installed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolOrder {
    /// Order in which symbols first appear in the layout
    #[default]
    FirstSeen,
    /// Listed symbols first, in list order; the rest in first-seen order
    Priority(Vec<String>),
}

impl ToolOrder {
    /// Arrange the non-empty groups
    pub fn arrange<'a>(&self, groups: &'a GlyphGroups) -> Vec<(&'a str, &'a [Placement])> {
        let mut ordered: Vec<(&str, &[Placement])> = Vec::with_capacity(groups.len());
        if let ToolOrder::Priority(symbols) = self {
            for symbol in symbols {
                if ordered.iter().any(|(s, _)| *s == symbol.as_str()) {
                    continue;
                }
                if let Some(entry) = groups.entry(symbol) {
                    ordered.push(entry);
                }
            }
        }
        for (symbol, placements) in groups.iter() {
            if !ordered.iter().any(|(s, _)| *s == symbol) {
                ordered.push((symbol, placements));
            }
        }
        ordered.retain(|(_, placements)| !placements.is_empty());
        ordered
    }
}

/// Generator for stamping programs
pub struct StampToolpathGenerator {
    profile: MachineProfile,
    order: ToolOrder,
    generated_at: String,
}

impl StampToolpathGenerator {
    pub fn new(profile: MachineProfile) -> Self {
        Self {
            profile,
            order: ToolOrder::default(),
            generated_at: "unknown date".to_string(),
        }
    }

    pub fn with_order(mut self, order: ToolOrder) -> Self {
        self.order = order;
        self
    }

    /// Timestamp printed in the header
    pub fn with_timestamp(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = generated_at.into();
        self
    }

    pub fn profile(&self) -> &MachineProfile {
        &self.profile
    }

    /// Build the program for a set of groups
    ///
    /// An ink point is drawn from `rng` for every placement, whether or not
    /// it re-inks, so the same seed always produces the same program.
    pub fn generate<R: Rng + ?Sized>(&self, groups: &GlyphGroups, rng: &mut R) -> MotionScript {
        let mut script = MotionScript::new();
        self.start(&mut script);

        let mut presses = 0;
        let ordered = self.order.arrange(groups);
        for (emitted, (symbol, placements)) in ordered.iter().enumerate() {
            let tool = emitted + self.profile.tool_index_base();
            self.install_tool(&mut script, tool, symbol);
            debug!("Tool {}: '{}' with {} presses", tool, symbol, placements.len());

            for placement in placements.iter() {
                let (ink_x, ink_y) = self.profile.ink_range().sample(rng);
                if placement.reink {
                    self.ink(&mut script, ink_x, ink_y);
                }
                let (x, y) = self.profile.to_bed(placement.x, placement.y);
                self.stamp(&mut script, x, y);
                if placement.double_tap {
                    self.stamp(&mut script, ink_x, ink_y);
                }
                presses += 1;
            }
        }

        self.end(&mut script);
        info!(
            "Generated {} lines for {} tools and {} presses",
            script.len(),
            ordered.len(),
            presses
        );
        script
    }

    fn start(&self, script: &mut MotionScript) {
        for line in self.profile.header_comments(&self.generated_at) {
            script.push(MotionCommand::Comment(line));
        }
        script.push(MotionCommand::Absolute);
    }

    fn install_tool(&self, script: &mut MotionScript, index: usize, symbol: &str) {
        let up = self.profile.heights().up;
        script.push(MotionCommand::RapidZ(up));
        script.push(MotionCommand::Comment(format!(
            "Install Tool: {}. Layer: {}",
            index, symbol
        )));
        script.push(MotionCommand::Rapid { x: 0.0, y: 0.0 });
        script.push(MotionCommand::RapidZ(up));
        script.push(MotionCommand::Pause);
        script.push(MotionCommand::Comment("CLEAR".to_string()));
    }

    fn ink(&self, script: &mut MotionScript, x: f64, y: f64) {
        let heights = self.profile.heights();
        script.push(MotionCommand::Comment("ink".to_string()));
        script.push(MotionCommand::RapidZ(heights.up));
        script.push(MotionCommand::Rapid { x, y });
        script.push(MotionCommand::RapidZ(heights.ink));
        script.push(MotionCommand::RapidZ(heights.up));
    }

    fn stamp(&self, script: &mut MotionScript, x: f64, y: f64) {
        let heights = self.profile.heights();
        script.push(MotionCommand::Comment("stamp".to_string()));
        script.push(MotionCommand::RapidZ(heights.up));
        script.push(MotionCommand::Rapid { x, y });
        script.push(MotionCommand::RapidZ(heights.down));
        script.push(MotionCommand::RapidZ(heights.up));
    }

    fn end(&self, script: &mut MotionScript) {
        script.push(MotionCommand::Comment("end".to_string()));
        script.push(MotionCommand::RapidZ(self.profile.heights().up));
        script.push(MotionCommand::Rapid { x: 0.0, y: 0.0 });
        script.push(MotionCommand::ToolOff);
        script.push(MotionCommand::ProgramEnd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group;
    use stampkit_core::ReinkPolicy;

    #[test]
    fn test_command_formatting() {
        assert_eq!(MotionCommand::Comment("ink".into()).to_string(), "( ink )");
        assert_eq!(
            MotionCommand::Rapid { x: 1.0, y: -0.0001 }.to_string(),
            "G0 X1.000 Y0.000"
        );
        assert_eq!(MotionCommand::RapidZ(60.0).to_string(), "G0 Z60.000");
        assert_eq!(MotionCommand::Absolute.to_string(), "G90");
    }

    #[test]
    fn test_priority_order() {
        let placements: Vec<Placement> = ["3", "1", "2", "3"]
            .iter()
            .map(|s| Placement::new(*s, 0.0, 0.0))
            .collect();
        let mut groups = group(&placements, ReinkPolicy::Always);
        groups.declare("9");

        let order = ToolOrder::Priority(vec!["1".into(), "2".into(), "5".into()]);
        let symbols: Vec<&str> = order.arrange(&groups).iter().map(|(s, _)| *s).collect();
        assert_eq!(symbols, ["1", "2", "3"]);

        let symbols: Vec<&str> = ToolOrder::FirstSeen
            .arrange(&groups)
            .iter()
            .map(|(s, _)| *s)
            .collect();
        assert_eq!(symbols, ["3", "1", "2"]);
    }
}
