use crate::args::{ImageSrcArgs, ImagesCmd};
use crate::utils::cli::ico_check;
use crate::Result;
use oait::ais::{image, AisClient, FileId};
use oait::config::Config;
use oait::output::{default_output_path, write_value, OutputValue};
use std::path::PathBuf;

const DEFAULT_PREFIX: &str = "image";

pub(super) async fn exec(cmd: ImagesCmd, ais: &AisClient, config: &Config) -> Result<()> {
	match cmd {
		ImagesCmd::Gen {
			prompt,
			model,
			size,
			output,
		} => {
			let model = model.as_deref().unwrap_or(&config.image_model);
			let size = size.as_deref().unwrap_or(&config.image_size);
			let res = image::generate_image(ais, &prompt, model, size).await?;
			let value = image::image_records(res)?;
			emit(&value, output)
		}
		ImagesCmd::Ret { src, output } => {
			let bytes = fetch(ais, src).await?;
			emit(&OutputValue::Binary(bytes), output)
		}
	}
}

async fn fetch(ais: &AisClient, src: ImageSrcArgs) -> Result<Vec<u8>> {
	let bytes = match (src.file_id, src.url) {
		(Some(file_id), _) => image::fetch_image_by_file_id(ais, &FileId::from(file_id)).await?,
		(None, Some(url)) => {
			// urls pasted from a shell often carry escaping backslashes
			let url = url.replace('\\', "");
			image::fetch_image_by_url(ais, &url).await?
		}
		(None, None) => return Err("images ret needs a file id (-f) or an url (-u)".into()),
	};

	Ok(bytes)
}

/// Writes to `output`, or to `image-<timestamp>.<json|png>` when absent.
fn emit(value: &OutputValue, output: Option<PathBuf>) -> Result<()> {
	let dest = output.unwrap_or_else(|| default_output_path(DEFAULT_PREFIX, value));

	write_value(value, &dest)?;
	eprintln!("{} Saved to {}", ico_check(), dest.display());

	Ok(())
}
