/// This module resolves compiled contract artifacts by contract name. Both the
/// Hardhat layout (`artifacts/contracts/Foo.sol/Foo.json`, bytecode as a hex
/// string) and the Foundry layout (`out/Foo.sol/Foo.json`, bytecode under
/// `object`) are understood.
use std::{
    fs,
    path::{Path, PathBuf},
};

use ethers::{abi::Abi, types::Bytes};
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use tracing::debug;

/// A compiled contract that is ready to be turned into a contract factory.
#[derive(Clone, Debug)]
pub struct Artifact {
    pub name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl Artifact {
    /// Interfaces and abstract contracts compile to empty creation code.
    pub fn is_deployable(&self) -> bool {
        !self.bytecode.is_empty()
    }
}

#[derive(Deserialize)]
struct RawArtifact {
    abi: Abi,
    bytecode: RawBytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(Bytes),
    Object { object: Bytes },
}

impl From<RawBytecode> for Bytes {
    fn from(r: RawBytecode) -> Self {
        match r {
            RawBytecode::Hex(bytes) | RawBytecode::Object { object: bytes } => bytes,
        }
    }
}

/// A directory of compiler output.
#[derive(Clone, Debug)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Finds the artifact file for a contract. The name is either a bare
    /// contract name like `ERC4907`, which must be unique in the tree, or a
    /// fully qualified name like `contracts/ERC4907.sol:ERC4907`.
    pub fn find(&self, name: &str) -> Result<PathBuf> {
        if let Some((source, contract)) = name.split_once(':') {
            let path = self.root.join(source).join(format!("{}.json", contract));
            if !path.is_file() {
                return Err(eyre!(
                    "artifact for {} not found at {}",
                    name,
                    path.display()
                ));
            }
            return Ok(path);
        }

        let mut matches = Vec::new();
        collect_matches(&self.root, name, &mut matches).wrap_err_with(|| {
            format!(
                "failed to read artifacts directory {}",
                self.root.display()
            )
        })?;
        matches.sort();
        match matches.len() {
            0 => Err(eyre!(
                "artifact for {} not found under {}",
                name,
                self.root.display()
            )),
            1 => Ok(matches.remove(0)),
            _ => Err(eyre!(
                "multiple artifacts for {}, use a fully qualified name instead: {}",
                name,
                matches
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }

    /// Finds and parses the artifact for a contract.
    pub fn load(&self, name: &str) -> Result<Artifact> {
        let path = self.find(name)?;
        debug!(contract = name, path = %path.display(), "loading artifact");
        let contents = fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read artifact {}", path.display()))?;
        let raw: RawArtifact = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("failed to parse artifact {}", path.display()))?;
        let contract = name.rsplit(':').next().unwrap_or(name);
        Ok(Artifact {
            name: contract.to_string(),
            abi: raw.abi,
            bytecode: raw.bytecode.into(),
        })
    }
}

fn collect_matches(dir: &Path, name: &str, matches: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_matches(&path, name, matches)?;
        } else if path.extension().is_some_and(|ext| ext == "json")
            && path.file_stem().is_some_and(|stem| stem == name)
        {
            matches.push(path);
        }
    }
    Ok(())
}
