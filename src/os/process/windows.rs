use std::ffi::OsStr;
use std::io;
use std::iter;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::process::CommandExt;
use std::process::Command;

use tracing::warn;
use windows_sys::Win32::Foundation::{CloseHandle, HANDLE, WAIT_FAILED};
use windows_sys::Win32::System::Threading::{
    GetExitCodeProcess, WaitForSingleObject, CREATE_NO_WINDOW, INFINITE,
};
use windows_sys::Win32::UI::Shell::{
    ShellExecuteExW, SEE_MASK_FLAG_NO_UI, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW,
};
use windows_sys::Win32::UI::WindowsAndMessaging::SW_HIDE;

use super::CommandLine;

pub(super) fn apply_arguments(cmd: &mut Command, arguments: &str) {
    cmd.raw_arg(arguments).creation_flags(CREATE_NO_WINDOW);
}

pub(super) fn shell_execute_and_wait(command: &CommandLine) -> io::Result<Option<i32>> {
    let file = to_wide(&command.program);
    let parameters = to_wide(&command.arguments);

    let mut info: SHELLEXECUTEINFOW = unsafe { std::mem::zeroed() };
    info.cbSize = std::mem::size_of::<SHELLEXECUTEINFOW>() as u32;
    info.fMask = SEE_MASK_NOCLOSEPROCESS | SEE_MASK_FLAG_NO_UI;
    info.lpFile = file.as_ptr();
    info.lpParameters = parameters.as_ptr();
    info.nShow = SW_HIDE;

    if unsafe { ShellExecuteExW(&mut info) } == 0 {
        return Err(io::Error::last_os_error());
    }

    // Null when the request was handed to an already running process.
    if info.hProcess.is_null() {
        return Ok(None);
    }
    let process = OwnedProcess(info.hProcess);

    if unsafe { WaitForSingleObject(process.0, INFINITE) } == WAIT_FAILED {
        return Err(io::Error::last_os_error());
    }

    let mut exit_code: u32 = 0;
    if unsafe { GetExitCodeProcess(process.0, &mut exit_code) } == 0 {
        let err = io::Error::last_os_error();
        warn!(program = %command.program, error = %err, "could not read exit code");
        return Ok(None);
    }

    Ok(Some(exit_code as i32))
}

struct OwnedProcess(HANDLE);

impl Drop for OwnedProcess {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

fn to_wide(value: &str) -> Vec<u16> {
    OsStr::new(value).encode_wide().chain(iter::once(0)).collect()
}
