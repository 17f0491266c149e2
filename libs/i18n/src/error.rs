/// Errors raised while parsing or formatting a message template.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("unexpected end of template")]
    UnexpectedEnd,
    #[error("unbalanced '}}' at position {0}")]
    UnbalancedBrace(usize),
    #[error("expected '{expected}' at position {position}")]
    Expected { expected: char, position: usize },
    #[error("empty argument name at position {0}")]
    EmptyArgument(usize),
    #[error("unknown argument type '{0}'")]
    UnknownType(String),
    #[error("invalid selector '{0}'")]
    InvalidSelector(String),
    #[error("argument '{0}' has no 'other' case")]
    MissingOther(String),
    #[error("missing argument '{0}'")]
    MissingArgument(String),
    #[error("argument '{0}' is not a number")]
    NotANumber(String),
}

#[derive(thiserror::Error, Debug)]
pub enum I18nError {
    #[error("Locale catalog not found: {0}")]
    CatalogNotFound(String),
    #[error("Malformed catalog for locale {locale}: {source}")]
    MalformedCatalog {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),
    #[error("Invalid message '{key}': {source}")]
    Format {
        key: String,
        #[source]
        source: FormatError,
    },
}
