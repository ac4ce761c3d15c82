use crate::config::AxleConfigInput;

pub const DEFAULT_TIRES_PER_SIDE: i64 = 2;

/// Returns a copy of `current` holding exactly `new_count` rows.
///
/// Extra rows are dropped from the tail. Missing rows are appended as
/// `Eje <n>` with dual tires, where `n` is the 1-based row number in the
/// resulting list.
pub fn resize_axle_list(current: &[AxleConfigInput], new_count: usize) -> Vec<AxleConfigInput> {
    let kept = current.len().min(new_count);

    let mut axles = current[..kept].to_vec();

    axles.extend(
        (kept..new_count).map(|index| AxleConfigInput::new(format!("Eje {}", index + 1), DEFAULT_TIRES_PER_SIDE)),
    );

    axles
}
