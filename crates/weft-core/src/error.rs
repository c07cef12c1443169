//! Error types for weft.
//!
//! Every error here is a contract violation by the caller: an id that does not
//! resolve, a structural request the tree cannot honor, or a value outside its
//! domain. They are reported immediately and are not meant to be retried.

use std::fmt;

use crate::id::WidgetId;

/// The main error type for widget-tree operations.
#[derive(Debug, Clone, PartialEq)]
pub enum WeftError {
    /// The widget id does not resolve (never created or already destroyed).
    WidgetNotFound(WidgetId),
    /// Children were added to a widget that cannot hold children.
    NotAContainer(WidgetId),
    /// The container already holds as many children as it accepts.
    ContainerFull {
        /// The container.
        container: WidgetId,
        /// How many children it accepts.
        capacity: usize,
    },
    /// A widget was added under itself or under one of its own descendants.
    CyclicParent {
        /// The intended parent.
        parent: WidgetId,
        /// The widget being added.
        child: WidgetId,
    },
    /// The widget is not a child of the given parent.
    NotAChild {
        /// The supposed parent.
        parent: WidgetId,
        /// The widget.
        child: WidgetId,
    },
    /// The widget is not in the desktop's top-level list.
    NotTopLevel(WidgetId),
    /// The widget's behavior is not of the requested type.
    UnexpectedType {
        /// The widget.
        id: WidgetId,
        /// The requested behavior type.
        expected: &'static str,
    },
    /// A grid span of zero.
    InvalidSpan {
        /// `"column"` or `"row"`.
        axis: &'static str,
        /// The rejected span.
        span: usize,
    },
    /// A grid cell index or span past the largest grid a layout handles.
    GridOutOfRange {
        /// `"column"`, `"row"`, `"column_span"` or `"row_span"`.
        property: &'static str,
        /// The rejected value.
        value: usize,
        /// The exclusive upper bound.
        limit: usize,
    },
    /// A numeric property outside its allowed domain.
    InvalidValue {
        /// The property name.
        property: &'static str,
        /// The rejected value.
        value: f32,
    },
}

impl fmt::Display for WeftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WidgetNotFound(id) => write!(f, "Widget {id:?} does not exist"),
            Self::NotAContainer(id) => write!(f, "Widget {id:?} cannot hold children"),
            Self::ContainerFull {
                container,
                capacity,
            } => write!(
                f,
                "Container {container:?} already holds its maximum of {capacity} children"
            ),
            Self::CyclicParent { parent, child } => write!(
                f,
                "Cannot add {child:?} to {parent:?}: the widget would become its own ancestor"
            ),
            Self::NotAChild { parent, child } => {
                write!(f, "Widget {child:?} is not a child of {parent:?}")
            }
            Self::NotTopLevel(id) => write!(f, "Widget {id:?} is not a top-level widget"),
            Self::UnexpectedType { id, expected } => {
                write!(f, "Widget {id:?} is not a {expected}")
            }
            Self::InvalidSpan { axis, span } => {
                write!(f, "Grid {axis} span must be at least 1, got {span}")
            }
            Self::GridOutOfRange {
                property,
                value,
                limit,
            } => write!(f, "Grid {property} {value} must be below {limit}"),
            Self::InvalidValue { property, value } => {
                write!(f, "Value {value} is out of range for {property}")
            }
        }
    }
}

impl std::error::Error for WeftError {}

/// Result type for widget-tree operations.
pub type WeftResult<T> = Result<T, WeftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_values() {
        let err = WeftError::InvalidSpan {
            axis: "column",
            span: 0,
        };
        assert_eq!(err.to_string(), "Grid column span must be at least 1, got 0");

        let err = WeftError::InvalidValue {
            property: "opacity",
            value: 1.5,
        };
        assert!(err.to_string().contains("opacity"));
    }
}
