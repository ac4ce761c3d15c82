use std::fmt;
use colored::Colorize;
use crate::layout::generator::count_total_tires;
use crate::layout::{Arrangement, Axle, Tire};

const LABEL_WIDTH: usize = 4;
const MAX_TIRES_PER_SIDE: usize = 3;

/// Text diagram of a tire layout, one line per axle.
///
/// Left tires are printed outermost first and right tires innermost first,
/// so `position_in_side` grows outward from the axle bar on both sides.
pub struct Diagram<'a>(pub &'a [Axle]);

fn tire_label(tire: &Tire) -> String {
    format!("[{:>2}]", tire.global_position).cyan().to_string()
}

impl<'a> fmt::Display for Diagram<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for axle in self.0 {
            let arrangement = axle.arrangement().map(Arrangement::label).unwrap_or("?");

            writeln!(
                f,
                "{} · {} ({})",
                format!("Eje {}", axle.number).bold(),
                axle.name,
                arrangement
            )?;

            let left: Vec<String> = axle.left_tires().rev().map(tire_label).collect();
            let right: Vec<String> = axle.right_tires().map(tire_label).collect();

            let padding = LABEL_WIDTH * MAX_TIRES_PER_SIDE.saturating_sub(left.len());

            writeln!(f, "  {}{} ═══ {}", " ".repeat(padding), left.concat(), right.concat())?;
        }

        write!(f, "Total tires: {}", count_total_tires(self.0))
    }
}
