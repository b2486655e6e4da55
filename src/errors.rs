use std::fmt;

#[derive(Debug, Clone)]
pub enum MxxnError {
    PackageNotExist(String),
    MxnNotExist(String),
    MxnAppNotExist(String),
    MultipleMxnApps(String),
    DuplicatePackage(String),
    RootRoute(String),
    Routing(String),
    FileNotExist(String),
    PathNotExist(String),
    SettingsFormat(String),
    ConfigFormat(String),
    NoDefaultConfig(String),
    TooManyDefaultConfigs(String),
    NotSameDefaults(String),
    NoThemeConfig(String),
    NoStringsConfig(String),
    ConfigNotFound(String),
    DatabaseUrl(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Migration(String),
    FileOperation(String),
    Serialization(String),
    Template(String),
}

impl MxxnError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            MxxnError::PackageNotExist(_) => "E001",
            MxxnError::MxnNotExist(_) => "E002",
            MxxnError::MxnAppNotExist(_) => "E003",
            MxxnError::MultipleMxnApps(_) => "E004",
            MxxnError::DuplicatePackage(_) => "E005",
            MxxnError::RootRoute(_) => "E006",
            MxxnError::Routing(_) => "E007",
            MxxnError::FileNotExist(_) => "E008",
            MxxnError::PathNotExist(_) => "E009",
            MxxnError::SettingsFormat(_) => "E010",
            MxxnError::ConfigFormat(_) => "E011",
            MxxnError::NoDefaultConfig(_) => "E012",
            MxxnError::TooManyDefaultConfigs(_) => "E013",
            MxxnError::NotSameDefaults(_) => "E014",
            MxxnError::NoThemeConfig(_) => "E015",
            MxxnError::NoStringsConfig(_) => "E016",
            MxxnError::ConfigNotFound(_) => "E017",
            MxxnError::DatabaseUrl(_) => "E018",
            MxxnError::DatabaseConnection(_) => "E019",
            MxxnError::DatabaseOperation(_) => "E020",
            MxxnError::Migration(_) => "E021",
            MxxnError::FileOperation(_) => "E022",
            MxxnError::Serialization(_) => "E023",
            MxxnError::Template(_) => "E024",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            MxxnError::PackageNotExist(_) => "Package Not Exist",
            MxxnError::MxnNotExist(_) => "Mxn Not Exist",
            MxxnError::MxnAppNotExist(_) => "MxnApp Not Exist",
            MxxnError::MultipleMxnApps(_) => "Multiple MxnApps",
            MxxnError::DuplicatePackage(_) => "Duplicate Package",
            MxxnError::RootRoute(_) => "Root Route Error",
            MxxnError::Routing(_) => "Routing Error",
            MxxnError::FileNotExist(_) => "File Not Exist",
            MxxnError::PathNotExist(_) => "Path Not Exist",
            MxxnError::SettingsFormat(_) => "Settings Format Error",
            MxxnError::ConfigFormat(_) => "Config Format Error",
            MxxnError::NoDefaultConfig(_) => "No Default Config",
            MxxnError::TooManyDefaultConfigs(_) => "Too Many Default Configs",
            MxxnError::NotSameDefaults(_) => "Not Same Defaults",
            MxxnError::NoThemeConfig(_) => "No Theme Config",
            MxxnError::NoStringsConfig(_) => "No Strings Config",
            MxxnError::ConfigNotFound(_) => "Config Not Found",
            MxxnError::DatabaseUrl(_) => "Database URL Error",
            MxxnError::DatabaseConnection(_) => "Database Connection Error",
            MxxnError::DatabaseOperation(_) => "Database Operation Error",
            MxxnError::Migration(_) => "Migration Error",
            MxxnError::FileOperation(_) => "File Operation Error",
            MxxnError::Serialization(_) => "Serialization Error",
            MxxnError::Template(_) => "Template Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            MxxnError::PackageNotExist(msg)
            | MxxnError::MxnNotExist(msg)
            | MxxnError::MxnAppNotExist(msg)
            | MxxnError::MultipleMxnApps(msg)
            | MxxnError::DuplicatePackage(msg)
            | MxxnError::RootRoute(msg)
            | MxxnError::Routing(msg)
            | MxxnError::FileNotExist(msg)
            | MxxnError::PathNotExist(msg)
            | MxxnError::SettingsFormat(msg)
            | MxxnError::ConfigFormat(msg)
            | MxxnError::NoDefaultConfig(msg)
            | MxxnError::TooManyDefaultConfigs(msg)
            | MxxnError::NotSameDefaults(msg)
            | MxxnError::NoThemeConfig(msg)
            | MxxnError::NoStringsConfig(msg)
            | MxxnError::ConfigNotFound(msg)
            | MxxnError::DatabaseUrl(msg)
            | MxxnError::DatabaseConnection(msg)
            | MxxnError::DatabaseOperation(msg)
            | MxxnError::Migration(msg)
            | MxxnError::FileOperation(msg)
            | MxxnError::Serialization(msg)
            | MxxnError::Template(msg) => msg,
        }
    }

    /// Colored output for the server console.
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// Plain output for the command line.
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for MxxnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for MxxnError {}

impl MxxnError {
    pub fn package_not_exist<T: Into<String>>(msg: T) -> Self {
        MxxnError::PackageNotExist(msg.into())
    }

    pub fn mxn_not_exist<T: Into<String>>(msg: T) -> Self {
        MxxnError::MxnNotExist(msg.into())
    }

    pub fn mxn_app_not_exist<T: Into<String>>(msg: T) -> Self {
        MxxnError::MxnAppNotExist(msg.into())
    }

    pub fn multiple_mxn_apps<T: Into<String>>(msg: T) -> Self {
        MxxnError::MultipleMxnApps(msg.into())
    }

    pub fn duplicate_package<T: Into<String>>(msg: T) -> Self {
        MxxnError::DuplicatePackage(msg.into())
    }

    pub fn root_route<T: Into<String>>(msg: T) -> Self {
        MxxnError::RootRoute(msg.into())
    }

    pub fn routing<T: Into<String>>(msg: T) -> Self {
        MxxnError::Routing(msg.into())
    }

    pub fn file_not_exist<T: Into<String>>(msg: T) -> Self {
        MxxnError::FileNotExist(msg.into())
    }

    pub fn path_not_exist<T: Into<String>>(msg: T) -> Self {
        MxxnError::PathNotExist(msg.into())
    }

    pub fn settings_format<T: Into<String>>(msg: T) -> Self {
        MxxnError::SettingsFormat(msg.into())
    }

    pub fn config_format<T: Into<String>>(msg: T) -> Self {
        MxxnError::ConfigFormat(msg.into())
    }

    pub fn no_default_config<T: Into<String>>(msg: T) -> Self {
        MxxnError::NoDefaultConfig(msg.into())
    }

    pub fn too_many_default_configs<T: Into<String>>(msg: T) -> Self {
        MxxnError::TooManyDefaultConfigs(msg.into())
    }

    pub fn not_same_defaults<T: Into<String>>(msg: T) -> Self {
        MxxnError::NotSameDefaults(msg.into())
    }

    pub fn no_theme_config<T: Into<String>>(msg: T) -> Self {
        MxxnError::NoThemeConfig(msg.into())
    }

    pub fn no_strings_config<T: Into<String>>(msg: T) -> Self {
        MxxnError::NoStringsConfig(msg.into())
    }

    pub fn config_not_found<T: Into<String>>(msg: T) -> Self {
        MxxnError::ConfigNotFound(msg.into())
    }

    pub fn database_url<T: Into<String>>(msg: T) -> Self {
        MxxnError::DatabaseUrl(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        MxxnError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        MxxnError::DatabaseOperation(msg.into())
    }

    pub fn migration<T: Into<String>>(msg: T) -> Self {
        MxxnError::Migration(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        MxxnError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        MxxnError::Serialization(msg.into())
    }

    pub fn template<T: Into<String>>(msg: T) -> Self {
        MxxnError::Template(msg.into())
    }
}

impl From<sea_orm::DbErr> for MxxnError {
    fn from(err: sea_orm::DbErr) -> Self {
        MxxnError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for MxxnError {
    fn from(err: std::io::Error) -> Self {
        MxxnError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for MxxnError {
    fn from(err: serde_json::Error) -> Self {
        MxxnError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for MxxnError {
    fn from(err: config::ConfigError) -> Self {
        MxxnError::SettingsFormat(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MxxnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            MxxnError::package_not_exist(""),
            MxxnError::mxn_not_exist(""),
            MxxnError::mxn_app_not_exist(""),
            MxxnError::multiple_mxn_apps(""),
            MxxnError::duplicate_package(""),
            MxxnError::root_route(""),
            MxxnError::routing(""),
            MxxnError::file_not_exist(""),
            MxxnError::path_not_exist(""),
            MxxnError::settings_format(""),
            MxxnError::config_format(""),
            MxxnError::no_default_config(""),
            MxxnError::too_many_default_configs(""),
            MxxnError::not_same_defaults(""),
            MxxnError::no_theme_config(""),
            MxxnError::no_strings_config(""),
            MxxnError::config_not_found(""),
            MxxnError::database_url(""),
            MxxnError::database_connection(""),
            MxxnError::database_operation(""),
            MxxnError::migration(""),
            MxxnError::file_operation(""),
            MxxnError::serialization(""),
            MxxnError::template(""),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_format_simple() {
        let err = MxxnError::root_route("The APP_ROOT route can only be covered by mxxn.");
        assert_eq!(
            err.to_string(),
            "Root Route Error: The APP_ROOT route can only be covered by mxxn."
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MxxnError = io.into();
        assert!(matches!(err, MxxnError::FileOperation(_)));
        assert_eq!(err.message(), "gone");
    }
}
