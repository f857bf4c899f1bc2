use std::io::{BufWriter, Write};
use std::sync::Arc;

use argh::FromArgs;
use tracing::info;

use crate::command::Error;
use crate::configuration::ListingConfig;
use crate::container::ContainerListing;
use crate::enumerator::{BlobContainerEnumerable, ContinuationToken, Options as EnumeratorOptions};

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "list",
    description = "List the blob names of the configured container"
)]
pub struct Options {
    #[argh(option)]
    /// inclusive lower bound on blob names
    pub min: Option<String>,
    #[argh(option)]
    /// exclusive upper bound on blob names
    pub max: Option<String>,
    #[argh(option, short = 'p')]
    /// only list blob names starting with this prefix
    pub prefix: Option<String>,
    #[argh(option, short = 'n')]
    /// names requested per round trip, overrides `listing.page_size`
    pub page_size: Option<u16>,
    #[argh(option, short = 't')]
    /// resume after the blob a previous run printed this token for
    pub continuation_token: Option<String>,
    #[argh(option, short = 'l')]
    /// stop after printing this many names
    pub limit: Option<usize>,
}

pub struct Command {
    enumerable: BlobContainerEnumerable,
    limit: Option<usize>,
}

impl Command {
    pub fn new(
        options: &Options,
        listing: &ListingConfig,
        container: Arc<dyn ContainerListing>,
    ) -> Result<Self, Error> {
        let initial_continuation_token = options
            .continuation_token
            .as_deref()
            .map(str::parse::<ContinuationToken>)
            .transpose()?;

        let enumerable = BlobContainerEnumerable::with_options(
            container,
            EnumeratorOptions {
                initial_continuation_token,
                min_blob_name: options.min.clone(),
                max_blob_name: options.max.clone(),
                prefix: options.prefix.clone(),
                page_size: options.page_size.unwrap_or(listing.page_size),
            },
        )?;

        Ok(Self {
            enumerable,
            limit: options.limit,
        })
    }

    pub async fn run(&self) -> Result<(), Error> {
        let mut stdout = BufWriter::new(std::io::stdout());
        self.write_names(&mut stdout).await?;
        Ok(())
    }

    /// Writes one `name<TAB>token` line per blob and returns the number of lines.
    pub async fn write_names<W: Write>(&self, out: &mut W) -> Result<usize, Error> {
        let mut enumerator = self.enumerable.enumerator();
        let mut count = 0;

        while self.limit.is_none_or(|limit| count < limit) {
            let Some(item) = enumerator.next().await? else {
                info!("Listed {count} blob(s), enumeration complete");
                out.flush()?;
                return Ok(count);
            };

            writeln!(out, "{}\t{}", item.name, item.continuation_token)?;
            count += 1;
        }

        info!(
            "Listed {count} blob(s), resume with continuation token: {}",
            enumerator.continuation_token()
        );
        out.flush()?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_memory_container;

    fn default_options() -> Options {
        Options {
            min: None,
            max: None,
            prefix: None,
            page_size: None,
            continuation_token: None,
            limit: None,
        }
    }

    fn lines(output: &[u8]) -> Vec<(String, String)> {
        String::from_utf8(output.to_vec())
            .unwrap()
            .lines()
            .map(|line| {
                let (name, token) = line.split_once('\t').unwrap();
                (name.to_string(), token.to_string())
            })
            .collect()
    }

    #[tokio::test]
    async fn test_lists_bounded_names() {
        let container = create_memory_container(&["a", "b", "c", "d"]);
        let options = Options {
            min: Some("b".to_string()),
            max: Some("d".to_string()),
            page_size: Some(1),
            ..default_options()
        };
        let command =
            Command::new(&options, &ListingConfig::default(), Arc::new(container)).unwrap();

        let mut output = Vec::new();
        let count = command.write_names(&mut output).await.unwrap();

        assert_eq!(count, 2);
        let names: Vec<_> = lines(&output).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[tokio::test]
    async fn test_limit_and_resume_from_printed_token() {
        let container = create_memory_container(&["1/a", "2/a", "2/b", "3/a"]);
        let limited = Options {
            limit: Some(2),
            ..default_options()
        };
        let command = Command::new(
            &limited,
            &ListingConfig { page_size: 1 },
            Arc::new(container.clone()),
        )
        .unwrap();

        let mut output = Vec::new();
        assert_eq!(command.write_names(&mut output).await.unwrap(), 2);
        let first_run = lines(&output);
        assert_eq!(first_run[0].0, "1/a");
        assert_eq!(first_run[1].0, "2/a");

        let resumed = Options {
            continuation_token: Some(first_run[1].1.clone()),
            ..default_options()
        };
        let command =
            Command::new(&resumed, &ListingConfig::default(), Arc::new(container)).unwrap();

        let mut output = Vec::new();
        command.write_names(&mut output).await.unwrap();
        let names: Vec<_> = lines(&output).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["2/b", "3/a"]);
    }

    #[test]
    fn test_rejects_invalid_token() {
        let container = create_memory_container(&[]);
        let options = Options {
            continuation_token: Some("%%%".to_string()),
            ..default_options()
        };

        let result = Command::new(&options, &ListingConfig::default(), Arc::new(container));
        assert!(matches!(result, Err(Error::Enumerator(_))));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let container = create_memory_container(&[]);
        let options = Options {
            page_size: Some(0),
            ..default_options()
        };

        let result = Command::new(&options, &ListingConfig::default(), Arc::new(container));
        assert!(matches!(result, Err(Error::Enumerator(_))));
    }
}
