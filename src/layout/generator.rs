use crate::config::AxleConfigInput;
use crate::layout::{Arrangement, Axle, LayoutError, Position, Side, Tire};

/// Numbers every tire of the vehicle.
///
/// Axles are numbered by list position starting at 1. A single counter runs
/// over axle 1 left tires, axle 1 right tires, axle 2 left tires and so on,
/// so global positions are contiguous from 1. Input is validated as a whole
/// first, a rejected configuration never yields a partial layout.
pub fn generate_layout(axle_inputs: &[AxleConfigInput]) -> Result<Vec<Axle>, LayoutError> {
    let arrangements = validate(axle_inputs)?;

    let mut global_counter: Position = 1;

    let axles: Vec<Axle> = axle_inputs
        .iter()
        .zip(arrangements)
        .enumerate()
        .map(|(index, (input, arrangement))| {
            let number = index as u32 + 1;
            let per_side = arrangement.tires_per_side();

            let mut tires = Vec::with_capacity(2 * per_side as usize);

            for side in [Side::Left, Side::Right] {
                for position_in_side in 1..=per_side {
                    tires.push(Tire {
                        global_position: global_counter,
                        axle_number: number,
                        side,
                        position_in_side,
                    });

                    global_counter += 1;
                }
            }

            Axle {
                number,
                name: input.name.clone(),
                tires_per_side: per_side,
                tires,
            }
        })
        .collect();

    Ok(axles)
}

pub fn count_total_tires(axles: &[Axle]) -> usize {
    axles.iter().map(|axle| axle.tires.len()).sum()
}

fn validate(axle_inputs: &[AxleConfigInput]) -> Result<Vec<Arrangement>, LayoutError> {
    if axle_inputs.is_empty() {
        return Err(LayoutError::EmptyConfiguration);
    }

    axle_inputs
        .iter()
        .enumerate()
        .map(|(axle_index, input)| {
            if input.name.trim().is_empty() {
                return Err(LayoutError::InvalidAxleName { axle_index });
            }

            Arrangement::from_tires_per_side(input.tires_per_side).ok_or(LayoutError::InvalidTiresPerSide {
                axle_index,
                value: input.tires_per_side,
            })
        })
        .collect()
}
