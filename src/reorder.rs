use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error("index {index} out of bounds for list of length {len}")]
    OutOfBounds { index: usize, len: usize },
}

/// Move the element at `from` to `to`, keeping every other element's relative order.
pub fn reorder<T: Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>, ReorderError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReorderError::OutOfBounds { index, len });
        }
    }

    let mut result = items.to_vec();
    let item = result.remove(from);
    result.insert(to, item);
    Ok(result)
}

/// Direction of a single-step move button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Target index of a one-step move, or `None` when it would leave `0..len`.
    pub fn target(self, index: usize, len: usize) -> Option<usize> {
        let target = match self {
            Direction::Left => index.checked_sub(1)?,
            Direction::Right => index.checked_add(1)?,
        };
        (target < len && index < len).then_some(target)
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("unknown direction: {s}")),
        }
    }
}
