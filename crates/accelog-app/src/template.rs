//! Boilerplate `.c`/`.h` pair for a new firmware module.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTemplate {
    /// Lower-case module name, used for file names and includes.
    pub name: String,
    pub description: String,
    pub author: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("`{0}` is not a valid C identifier for a module name")]
    InvalidName(String),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl ModuleTemplate {
    pub fn new(name: &str, description: &str, author: &str) -> Result<Self, TemplateError> {
        let name = name.trim().to_lowercase();
        if !is_c_identifier(&name) {
            return Err(TemplateError::InvalidName(name));
        }
        Ok(Self {
            name,
            description: description.trim().to_string(),
            author: author.trim().to_string(),
        })
    }

    fn upper(&self) -> String {
        self.name.to_uppercase()
    }

    pub fn source(&self) -> String {
        format!(
            r#"/*! \file {name}.c
*
*  \brief {description}.
*
*
*  \author {author}
*/


/********************************** Includes *******************************************/
#include "{name}.h"

/*********************************** Consts ********************************************/


/************************************ Types ********************************************/


/*********************************** Macros ********************************************/


/******************************* Global Variables **************************************/


/******************************** Local Variables **************************************/


/****************************** Functions Prototype ************************************/


/****************************** Functions Definition ***********************************/
/**
* \name     {upper}_init
* \brief    Initialize the module variables and resources.
*
* \param    None
* \retval   None
*/
void {upper}_init( void )
{{
   /* Initialize the module here*/

}}
"#,
            name = self.name,
            upper = self.upper(),
            description = self.description,
            author = self.author,
        )
    }

    pub fn header(&self) -> String {
        format!(
            r#"/*! \file {name}.h
*
*  \brief {name} module functions and variables declarations.
*
*
*  \author {author}
*/

#pragma once

#ifdef __cplusplus
extern "C" {{
#endif
/********************************** Includes *******************************************/
#include "common.h"

/*********************************** Consts ********************************************/


/************************************ Types ********************************************/


/*********************************** Macros ********************************************/


/******************************* Global Variables **************************************/


/****************************** Functions Prototype ************************************/
void {upper}_init( void );


#ifdef __cplusplus
}}
#endif
"#,
            name = self.name,
            upper = self.upper(),
            author = self.author,
        )
    }

    /// Writes `<name>.c` and `<name>.h` into `dir`, replacing existing files.
    pub fn write_to(&self, dir: &Path) -> Result<[PathBuf; 2], TemplateError> {
        let c_path = dir.join(format!("{}.c", self.name));
        let h_path = dir.join(format!("{}.h", self.name));
        for (path, text) in [(&c_path, self.source()), (&h_path, self.header())] {
            std::fs::write(path, text).map_err(|source| TemplateError::Io {
                path: path.clone(),
                source,
            })?;
        }
        log::debug!("generated {} and {}", c_path.display(), h_path.display());
        Ok([c_path, h_path])
    }
}
