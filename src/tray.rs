//! System tray icon with right-click context menu.
//! Uses Win32 Shell_NotifyIconW API directly — no extra crate needed.
//! Runs on its own thread with a blocking message loop; menu actions
//! execute serially and share no state with the animation loop.

#[cfg(windows)]
use windows::core::PCWSTR;
#[cfg(windows)]
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, POINT, TRUE, WPARAM};
#[cfg(windows)]
use windows::Win32::UI::Shell::{
    Shell_NotifyIconW, NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW,
};
#[cfg(windows)]
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CheckMenuItem, CreateIconFromResourceEx, CreatePopupMenu, CreateWindowExW,
    DefWindowProcW, DestroyWindow, DispatchMessageW, GetCursorPos, GetMessageW, LoadIconW,
    RegisterClassW, SetForegroundWindow, TrackPopupMenu, TranslateMessage, CS_HREDRAW, CS_VREDRAW,
    HMENU, IDI_APPLICATION, LR_DEFAULTCOLOR, MENU_ITEM_FLAGS, MF_BYCOMMAND, MF_CHECKED,
    MF_SEPARATOR, MF_STRING, MF_UNCHECKED, TPM_BOTTOMALIGN, TPM_LEFTALIGN, WM_COMMAND, WM_DESTROY,
    WM_USER, WNDCLASSW, WS_EX_TOOLWINDOW,
};

#[cfg(windows)]
use crate::platform::autostart::{self, RegistryRunAtLogin};

/// Custom message ID for tray icon callbacks.
#[cfg(windows)]
const WM_TRAYICON: u32 = WM_USER + 1;

/// Menu item IDs.
#[cfg(windows)]
const ID_AUTOSTART: u16 = 1000;
#[cfg(windows)]
const ID_WEBSITE: u16 = 1001;
#[cfg(windows)]
const ID_QUIT: u16 = 1002;

/// Project page opened from the tray menu.
#[cfg(windows)]
const WEBSITE_URL: &str = "https://cursorcat.dev";

/// Embedded tray icon (PNG; CreateIconFromResourceEx decodes it).
#[cfg(windows)]
const ICON_PNG: &[u8] = include_bytes!("../assets/tray-icon.png");

/// Launch the tray controller on a dedicated thread. It blocks in its own
/// message loop for the life of the process; the only ways out are the
/// Quit item (which terminates the process) or process exit elsewhere.
pub fn spawn() {
    #[cfg(windows)]
    std::thread::spawn(|| {
        let mut tray = TrayIcon::new();
        tray.run_message_loop();
    });
}

/// System tray icon state: hidden message window, notify-icon data, and
/// the persistent context menu.
#[cfg(windows)]
struct TrayIcon {
    hwnd: HWND,
    nid: NOTIFYICONDATAW,
    menu: HMENU,
}

#[cfg(windows)]
impl TrayIcon {
    fn new() -> Self {
        unsafe {
            // Register a hidden window class for receiving tray messages.
            let class_name: Vec<u16> = "CursorCatTrayClass\0".encode_utf16().collect();
            let wc = WNDCLASSW {
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(tray_wnd_proc),
                lpszClassName: PCWSTR(class_name.as_ptr()),
                ..Default::default()
            };
            RegisterClassW(&wc);

            // Create a hidden message-only window.
            let hwnd = CreateWindowExW(
                WS_EX_TOOLWINDOW,
                PCWSTR(class_name.as_ptr()),
                PCWSTR::null(),
                Default::default(),
                0,
                0,
                0,
                0,
                HWND::default(),
                HMENU::default(),
                HINSTANCE::default(),
                None,
            )
            .expect("failed to create tray message window");

            let menu = build_menu();
            let nid = add_icon(hwnd);

            log::info!("System tray icon created");

            Self { hwnd, nid, menu }
        }
    }

    /// Block on the message queue until the window dies. Tray callbacks and
    /// menu selections both arrive here as posted messages.
    fn run_message_loop(&mut self) {
        unsafe {
            let mut msg = std::mem::zeroed();
            while GetMessageW(&mut msg, self.hwnd, 0, 0).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);

                if msg.message == WM_TRAYICON {
                    let event = (msg.lParam.0 & 0xFFFF) as u32;
                    // WM_RBUTTONUP = 0x0205
                    if event == 0x0205 {
                        self.show_menu();
                    }
                } else if msg.message == WM_COMMAND {
                    self.handle_command((msg.wParam.0 & 0xFFFF) as u16);
                }
            }
        }
    }

    /// Show the context menu at the cursor position.
    unsafe fn show_menu(&self) {
        let mut pt = POINT::default();
        let _ = GetCursorPos(&mut pt);

        // Required so menu closes when clicking outside
        let _ = SetForegroundWindow(self.hwnd);

        let _ = TrackPopupMenu(
            self.menu,
            TPM_LEFTALIGN | TPM_BOTTOMALIGN,
            pt.x,
            pt.y,
            0,
            self.hwnd,
            None,
        );
    }

    fn handle_command(&mut self, id: u16) {
        match id {
            ID_AUTOSTART => {
                let mut backend = RegistryRunAtLogin;
                if let Ok(exe) = std::env::current_exe() {
                    autostart::toggle(&mut backend, &exe);
                }
                // Force-check the item, then correct it from a fresh query
                // of the actual registration state.
                unsafe {
                    CheckMenuItem(self.menu, ID_AUTOSTART as u32, MF_BYCOMMAND.0 | MF_CHECKED.0);
                    if !autostart::is_enabled(&backend) {
                        CheckMenuItem(
                            self.menu,
                            ID_AUTOSTART as u32,
                            MF_BYCOMMAND.0 | MF_UNCHECKED.0,
                        );
                    }
                }
            }
            ID_WEBSITE => crate::platform::open_url(WEBSITE_URL),
            ID_QUIT => {
                log::info!("Quit selected from tray");
                self.remove();
                std::process::exit(0);
            }
            _ => {}
        }
    }

    /// Remove the tray icon and its hidden window.
    fn remove(&mut self) {
        unsafe {
            let _ = Shell_NotifyIconW(NIM_DELETE, &self.nid);
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

#[cfg(windows)]
impl Drop for TrayIcon {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Build the persistent context menu. The auto-start checkbox reflects the
/// registration state at startup; afterwards handle_command keeps it current.
#[cfg(windows)]
unsafe fn build_menu() -> HMENU {
    let menu = CreatePopupMenu().expect("failed to create popup menu");

    let check = if autostart::is_enabled(&RegistryRunAtLogin) {
        MF_CHECKED
    } else {
        MF_UNCHECKED
    };
    append_item(menu, MF_STRING | check, ID_AUTOSTART, "Run at login");
    append_item(menu, MF_STRING, ID_WEBSITE, "Website");
    let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
    append_item(menu, MF_STRING, ID_QUIT, "Quit");

    menu
}

#[cfg(windows)]
unsafe fn append_item(menu: HMENU, flags: MENU_ITEM_FLAGS, id: u16, label: &str) {
    let wide: Vec<u16> = label.encode_utf16().chain(std::iter::once(0)).collect();
    let _ = AppendMenuW(menu, flags, id as usize, PCWSTR(wide.as_ptr()));
}

/// Register the notify icon on the given window.
#[cfg(windows)]
unsafe fn add_icon(hwnd: HWND) -> NOTIFYICONDATAW {
    let mut nid = NOTIFYICONDATAW::default();
    nid.cbSize = std::mem::size_of::<NOTIFYICONDATAW>() as u32;
    nid.hWnd = hwnd;
    nid.uID = 1;
    nid.uFlags = NIF_ICON | NIF_MESSAGE | NIF_TIP;
    nid.uCallbackMessage = WM_TRAYICON;

    // Embedded PNG icon, stock application icon as fallback.
    nid.hIcon = CreateIconFromResourceEx(ICON_PNG, TRUE, 0x0003_0000, 0, 0, LR_DEFAULTCOLOR)
        .or_else(|_| LoadIconW(None, IDI_APPLICATION))
        .unwrap_or_default();

    // Tooltip text
    let tip = "CursorCat - desktop pet";
    for (i, ch) in tip.encode_utf16().enumerate() {
        if i >= nid.szTip.len() - 1 {
            break;
        }
        nid.szTip[i] = ch;
    }

    let _ = Shell_NotifyIconW(NIM_ADD, &nid);

    nid
}

/// Window procedure for the hidden tray message window. Everything the
/// controller cares about is read from the message queue in
/// `run_message_loop`; this just keeps the window alive.
#[cfg(windows)]
unsafe extern "system" fn tray_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_DESTROY {
        return LRESULT(0);
    }
    DefWindowProcW(hwnd, msg, wparam, lparam)
}
