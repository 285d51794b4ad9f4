use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E2xxx: Type errors
/// - E3xxx: Monomorphization errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Type Errors (E2xxx)
    /// Value type not assignable to expected type
    E2001,
    /// Unknown type name
    E2002,
    /// Unknown variable
    E2003,
    /// `this` outside an extension function
    E2004,
    /// Generic type used without type arguments
    E2005,
    /// Call of a non-function value
    E2006,
    /// Equality on a type without equality
    E2007,
    /// Operator not defined for operand types
    E2008,
    /// Dereference of a non-pointer
    E2009,
    /// Address taken of a non-addressable value
    E2010,
    /// Unknown field or extension method
    E2011,
    /// Too few arguments
    E2012,
    /// Too many arguments
    E2013,
    /// Type argument could not be inferred
    E2014,
    /// Expression type cannot be determined without context
    E2015,
    /// Constant initializer of a non-constant type
    E2016,

    // Monomorphization Errors (E3xxx)
    /// Too many distinct specializations
    E3001,

    // Internal Errors (E9xxx)
    /// Lowered module failed validation
    E9001,
}

impl ErrorCode {
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E2013,
        ErrorCode::E2014,
        ErrorCode::E2015,
        ErrorCode::E2016,
        ErrorCode::E3001,
        ErrorCode::E9001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E2016 => "E2016",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line summary, used for `--explain`-style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "type is not assignable to the expected type",
            ErrorCode::E2002 => "unbound type name",
            ErrorCode::E2003 => "unbound variable",
            ErrorCode::E2004 => "`this` used outside an extension function",
            ErrorCode::E2005 => "generic type is missing type arguments",
            ErrorCode::E2006 => "value is not callable",
            ErrorCode::E2007 => "type does not support equality",
            ErrorCode::E2008 => "operator not applicable to operand types",
            ErrorCode::E2009 => "not a pointer type",
            ErrorCode::E2010 => "value is not addressable",
            ErrorCode::E2011 => "no such property",
            ErrorCode::E2012 => "missing arguments",
            ErrorCode::E2013 => "too many arguments",
            ErrorCode::E2014 => "type parameter cannot be inferred",
            ErrorCode::E2015 => "ambiguous expression",
            ErrorCode::E2016 => "not a constant",
            ErrorCode::E3001 => "specialization limit exceeded",
            ErrorCode::E9001 => "internal compiler error",
        }
    }

    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_internal(&self) -> bool {
        self.as_str().starts_with("E9")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
