//! NVIDIA GPU session state from the `nvidia-smi -q -x` XML report.
//!
//! Only a small subset of the report is read:
//!
//! ```text
//! <nvidia_smi_log>
//!   <gpu>
//!     <display_active>Enabled|Disabled</display_active>
//!     <processes>
//!       <process_info><process_name>...</process_name></process_info>
//!     </processes>
//!   </gpu>
//! </nvidia_smi_log>
//! ```

use roxmltree::{Document, Node, ParsingOptions};
use serde::{Deserialize, Serialize};

use crate::error::{HostError, Result};

const ROOT: &str = "nvidia_smi_log";

/// Display and process state of the NVIDIA GPU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvidiaInformation {
    /// A display is currently driven by the GPU
    pub display_active: bool,
    /// Number of processes holding a context on the GPU
    pub process_count: usize,
    /// Executable names of those processes, in report order
    pub process_names: Vec<String>,
}

/// Parse an `nvidia-smi -q -x` report.
///
/// Missing elements are reported as [`HostError::Parse`] naming the element.
pub fn parse_nvidia_smi_xml(xml: &str) -> Result<NvidiaInformation> {
    // The report starts with a DOCTYPE referencing nvsmi_device_*.dtd.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(xml, options).map_err(|err| HostError::Parse {
        element: ROOT,
        reason: format!("malformed XML: {err}"),
    })?;

    let root = document.root_element();
    if !root.has_tag_name(ROOT) {
        return Err(HostError::Parse {
            element: ROOT,
            reason: format!("unexpected root element <{}>", root.tag_name().name()),
        });
    }

    let gpu = child(root, "gpu")?;
    let display_active = text_of(child(gpu, "display_active")?) == "Enabled";

    let process_names = child(gpu, "processes")?
        .children()
        .filter(|node| node.has_tag_name("process_info"))
        .map(|info| {
            let name = text_of(child(info, "process_name")?);
            Ok(file_name(&name).to_string())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(NvidiaInformation {
        display_active,
        process_count: process_names.len(),
        process_names,
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &'static str) -> Result<Node<'a, 'input>> {
    node.children()
        .find(|child| child.has_tag_name(name))
        .ok_or_else(|| HostError::missing(name))
}

/// All text below the element, so comments or CDATA sections do not split the value.
fn text_of(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|descendant| descendant.is_text())
        .filter_map(|descendant| descendant.text())
        .collect()
}

/// Final path component, accepting both separators since the report may carry Windows paths.
fn file_name(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}
