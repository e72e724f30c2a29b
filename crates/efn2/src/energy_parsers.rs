use std::path::PathBuf;
use ef_energy::Efn2;
use ef_energy::ParamError;
use clap::Args;
use log::debug;

/// Free energy evaluation parameters.
#[derive(Debug, Args)]
pub struct ParameterArguments {
    /// Directory with the nearest neighbor parameter files
    #[arg(short = 'd', long, value_name = "DIR", default_value = "./dat")]
    pub parameters: PathBuf,
}

impl ParameterArguments {
    pub fn build_model(&self) -> Result<Efn2, ParamError> {
        debug!("Using parameter directory: {}", self.parameters.display());
        Efn2::from_directory(&self.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        parameters: ParameterArguments,
    }

    #[test]
    fn test_default_directory() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.parameters.parameters, PathBuf::from("./dat"));
        let cli = TestCli::parse_from(["test", "--parameters", "/opt/rnastructure/data"]);
        assert_eq!(cli.parameters.parameters, PathBuf::from("/opt/rnastructure/data"));
    }

    #[test]
    fn test_missing_directory() {
        let cli = TestCli::parse_from(["test", "-d", "/nonexistent/efn2/parameters"]);
        assert!(matches!(cli.parameters.build_model(),
            Err(ParamError::MissingParameterFile(_))));
    }
}
