//! WMI (`root\CIMV2`) backend.

use serde::Deserialize;
use tracing::debug;
use wmi::{COMLibrary, WMIConnection, WMIError};

use crate::error::{HostError, Result};
use crate::hardware::{MachineInformation, VideoCardInformation};

#[derive(Deserialize, Debug)]
#[serde(rename = "Win32_ComputerSystemProduct")]
#[serde(rename_all = "PascalCase")]
struct ComputerSystemProduct {
    vendor: Option<String>,
    version: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename = "Win32_VideoController")]
#[serde(rename_all = "PascalCase")]
struct VideoController {
    adapter_compatibility: Option<String>,
    #[serde(rename = "PNPDeviceID")]
    pnp_device_id: Option<String>,
}

/// Opens a WMI session for the duration of one query. COM and the connection are released
/// when the returned value drops.
fn connect() -> Result<WMIConnection> {
    let com = COMLibrary::new().map_err(query_error)?;
    WMIConnection::new(com.into()).map_err(query_error)
}

fn query_error(err: WMIError) -> HostError {
    HostError::Query(err.to_string())
}

pub(in crate::hardware) fn machine_information() -> Result<MachineInformation> {
    let connection = connect()?;
    let products: Vec<ComputerSystemProduct> = connection.query().map_err(query_error)?;
    debug!(records = products.len(), "queried Win32_ComputerSystemProduct");

    Ok(products
        .into_iter()
        .next()
        .map(|product| MachineInformation {
            vendor: product.vendor.unwrap_or_default(),
            model: product.version.unwrap_or_default(),
        })
        .unwrap_or_default())
}

pub(in crate::hardware) fn video_controllers() -> Result<Vec<VideoCardInformation>> {
    let connection = connect()?;
    let controllers: Vec<VideoController> = connection.query().map_err(query_error)?;
    debug!(records = controllers.len(), "queried Win32_VideoController");

    Ok(controllers
        .into_iter()
        .map(|controller| VideoCardInformation {
            manufacturer: controller.adapter_compatibility.unwrap_or_default(),
            device_id: controller.pnp_device_id.unwrap_or_default(),
        })
        .collect())
}
