use crate::{error::Error, model::ModelView, service::Service};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const GENMODEL_JAR: &str = "h2o-genmodel.jar";

/// A downloaded POJO, either written to disk or returned as its source.
#[derive(Debug, Clone, PartialEq)]
pub enum Pojo {
	Source(String),
	File(PathBuf),
}

impl<S> ModelView<S>
where
	S: Service,
{
	/**
	Download the model as Java source. With `dir` the source is written to `<dir>/<model id>.java`, and with `get_genmodel_jar` the jar it compiles against is written next to it. Without `dir` the source is returned.
	*/
	pub fn download_pojo(&mut self, dir: Option<&Path>, get_genmodel_jar: bool) -> Result<Pojo> {
		if dir.is_none() && get_genmodel_jar {
			return Err(Error::InvalidArgument(
				"a directory is required to download the genmodel jar".to_owned(),
			)
			.into());
		}
		let id = self.model_id()?;
		let file = self.service().fetch_file(&format!("3/Models.java/{}", id))?;
		let dir = match dir {
			Some(dir) => dir,
			None => {
				let source = String::from_utf8(file.bytes).context("the POJO is not valid UTF-8")?;
				return Ok(Pojo::Source(source));
			}
		};
		let path = dir.join(format!("{}.java", id));
		write_file(&path, &file.bytes)?;
		if get_genmodel_jar {
			self.download_genmodel_jar(dir)?;
		}
		Ok(Pojo::File(path))
	}

	/// Download the model as a MOJO into `dir`, under the name the cluster suggests. Only some algorithms can be exported this way.
	pub fn download_mojo(&mut self, dir: &Path, get_genmodel_jar: bool) -> Result<PathBuf> {
		let algorithm = self.algorithm()?;
		if !algorithm.supports_mojo() {
			return Err(Error::UnsupportedOperation(format!(
				"MOJOs are supported for drf, gbm, deepwater, glm and glrm models only, not {}",
				algorithm
			))
			.into());
		}
		let id = self.model_id()?;
		if get_genmodel_jar {
			self.download_genmodel_jar(dir)?;
		}
		let file = self.service().fetch_file(&format!("3/Models/{}/mojo", id))?;
		let file_name = file.file_name.unwrap_or_else(|| format!("{}.zip", id));
		let path = dir.join(file_name);
		write_file(&path, &file.bytes)?;
		Ok(path)
	}

	fn download_genmodel_jar(&self, dir: &Path) -> Result<PathBuf> {
		let file = self.service().fetch_file(&format!("3/{}", GENMODEL_JAR))?;
		let path = dir.join(GENMODEL_JAR);
		write_file(&path, &file.bytes)?;
		Ok(path)
	}
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
	std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
	log::info!("wrote {}", path.display());
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		mock::{deeplearning_regressor, gbm_regressor, MockService},
		service::RemoteFile,
	};

	fn scratch_dir(name: &str) -> PathBuf {
		let dir = std::env::temp_dir().join(format!("remodel_{}_{}", name, std::process::id()));
		std::fs::create_dir_all(&dir).unwrap();
		dir
	}

	fn file(file_name: Option<&str>, contents: &str) -> RemoteFile {
		RemoteFile {
			file_name: file_name.map(str::to_owned),
			bytes: contents.as_bytes().to_vec(),
		}
	}

	#[test]
	fn test_pojo_source() {
		let service = MockService::with_model(gbm_regressor("modelA"));
		service.insert_file("3/Models.java/modelA", file(None, "class modelA {}"));
		let mut model = ModelView::fetch(&service, "modelA").unwrap();
		assert_eq!(
			model.download_pojo(None, false).unwrap(),
			Pojo::Source("class modelA {}".to_owned())
		);
		assert!(model.download_pojo(None, true).is_err());
	}

	#[test]
	fn test_pojo_file_with_jar() {
		let dir = scratch_dir("pojo");
		let service = MockService::with_model(gbm_regressor("modelA"));
		service.insert_file("3/Models.java/modelA", file(None, "class modelA {}"));
		service.insert_file("3/h2o-genmodel.jar", file(None, "jar"));
		let mut model = ModelView::fetch(&service, "modelA").unwrap();
		let pojo = model.download_pojo(Some(&dir), true).unwrap();
		assert_eq!(pojo, Pojo::File(dir.join("modelA.java")));
		assert_eq!(std::fs::read_to_string(dir.join("modelA.java")).unwrap(), "class modelA {}");
		assert_eq!(std::fs::read_to_string(dir.join(GENMODEL_JAR)).unwrap(), "jar");
		std::fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn test_mojo() {
		let dir = scratch_dir("mojo");
		let service = MockService::with_model(gbm_regressor("modelA"));
		service.insert_file("3/Models/modelA/mojo", file(Some("gbm_modelA.zip"), "zip"));
		let mut model = ModelView::fetch(&service, "modelA").unwrap();
		let path = model.download_mojo(&dir, false).unwrap();
		assert_eq!(path, dir.join("gbm_modelA.zip"));
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "zip");
		std::fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn test_mojo_unsupported_before_request() {
		let service = MockService::with_model(deeplearning_regressor("dl"));
		let mut model = ModelView::fetch(&service, "dl").unwrap();
		let error = model.download_mojo(Path::new("."), true).unwrap_err();
		assert!(matches!(
			error.downcast_ref::<Error>(),
			Some(Error::UnsupportedOperation(_))
		));
		assert_eq!(service.calls(), vec!["fetch_model dl"]);
	}
}
