mod billing;
mod clipboard;
mod dataset;
mod error;
mod logging;
mod models;
mod notifications;
mod payload;
mod qr;
mod reference;
mod transaction;
mod util;

use billing::BillingView;
use chrono::Utc;
use clap::{Parser, Subcommand};
use clipboard::StdoutClipboard;
use models::{Announcement, Resident};
use notifications::NotificationPanel;
use payload::build_payload;
use qr::{CorrectionLevel, QrOptions};
use reference::{COPY_FAILURE_NOTICE, QR_FAILURE_NOTICE};
use std::path::PathBuf;
use std::time::Instant;
use transaction::TransactionIdGenerator;
use util::format_rupiah;

#[derive(Parser)]
#[command(name = "kalita-billing")]
#[command(about = "Kalita resident billing and announcements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Bills(BillsArgs),
    Payload(PayloadArgs),
    Qr(QrArgs),
    Notifications(NotificationsArgs),
}

#[derive(Parser)]
struct BillsArgs {
    #[arg(long)]
    residents: Option<PathBuf>,
    #[arg(long, default_value = "")]
    search: String,
}

#[derive(Parser)]
struct PayloadArgs {
    #[arg(long)]
    residents: Option<PathBuf>,
    #[arg(long)]
    resident: u32,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser)]
struct QrArgs {
    #[arg(long)]
    residents: Option<PathBuf>,
    #[arg(long)]
    resident: u32,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "data/qr")]
    output_dir: PathBuf,
    #[arg(long, default_value_t = 300)]
    width: u32,
    #[arg(long, default_value_t = 2)]
    margin: u32,
    #[arg(long, default_value = "#000000")]
    dark: String,
    #[arg(long, default_value = "#FFFFFF")]
    light: String,
    #[arg(long, default_value = "M")]
    level: String,
    #[arg(long, default_value_t = false)]
    data_uri: bool,
    #[arg(long, default_value_t = false)]
    copy: bool,
}

#[derive(Parser)]
struct NotificationsArgs {
    #[arg(long)]
    announcements: Option<PathBuf>,
    #[arg(long, value_delimiter = ',')]
    read: Vec<u32>,
    #[arg(long, default_value_t = false)]
    read_all: bool,
    #[arg(long, default_value_t = false)]
    reset: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("kalita-billing")?;
    let cli = Cli::parse();
    match cli.command {
        Command::Bills(args) => run_bills(args),
        Command::Payload(args) => run_payload(args),
        Command::Qr(args) => run_qr(args),
        Command::Notifications(args) => run_notifications(args),
    }
}

fn load_residents(path: Option<&PathBuf>) -> Result<Vec<Resident>, String> {
    match path {
        Some(path) => dataset::load_residents(path),
        None => Ok(reference::demo_residents()),
    }
}

fn load_announcements(path: Option<&PathBuf>) -> Result<Vec<Announcement>, String> {
    match path {
        Some(path) => dataset::load_announcements(path),
        None => Ok(reference::demo_announcements()),
    }
}

fn id_generator(seed: Option<u64>) -> TransactionIdGenerator {
    match seed {
        Some(seed) => TransactionIdGenerator::new(seed),
        None => TransactionIdGenerator::from_os_seed(),
    }
}

fn run_bills(args: BillsArgs) -> Result<(), String> {
    let residents = load_residents(args.residents.as_ref())?;
    let view = BillingView::new(
        residents,
        QrOptions::default(),
        TransactionIdGenerator::from_os_seed(),
    );

    let filtered = view.filter(&args.search);
    if filtered.is_empty() {
        emit_info_line(&format!(
            "Tidak ada warga yang cocok dengan \"{}\"",
            args.search
        ));
    }
    for resident in &filtered {
        println!(
            "{:>3}  {:<20} {:<28} {}",
            resident.id,
            resident.name,
            resident.address,
            format_rupiah(resident.amount)
        );
    }

    let summary = view.summary(&args.search);
    emit_info_line(&format!("Total Warga: {}", summary.residents));
    if let Some(nominal) = summary.nominal {
        emit_info_line(&format!("Nominal per Warga: {}", format_rupiah(nominal)));
    }
    emit_info_line(&format!("Total Tagihan: {}", format_rupiah(summary.total)));
    Ok(())
}

fn run_payload(args: PayloadArgs) -> Result<(), String> {
    let residents = load_residents(args.residents.as_ref())?;
    let resident = residents
        .iter()
        .find(|resident| resident.id == args.resident)
        .ok_or_else(|| format!("unknown resident id {}", args.resident))?;

    let now = Utc::now();
    let transaction = id_generator(args.seed).next_id_at(now);
    let text = build_payload(resident, &transaction.value, transaction.issued_at)
        .to_text()
        .map_err(|err| err.to_string())?;
    println!("{text}");
    Ok(())
}

fn run_qr(args: QrArgs) -> Result<(), String> {
    let residents = load_residents(args.residents.as_ref())?;
    let level: CorrectionLevel = args.level.parse().map_err(|err: error::QrError| err.to_string())?;
    let options = QrOptions {
        width: args.width,
        margin: args.margin,
        dark: args.dark,
        light: args.light,
        level,
    };

    let mut view = BillingView::new(residents, options, id_generator(args.seed));
    let job = match view.begin_qr(args.resident) {
        Ok(job) => job,
        Err(err @ error::BillingError::UnknownResident(_)) => return Err(err.to_string()),
        Err(err) => return Err(format!("{QR_FAILURE_NOTICE} ({err})")),
    };
    if view.is_generating(job.resident_id()) {
        emit_info_line(&format!("Membuat QR Code untuk warga {}...", job.resident_id()));
    }
    if let Err(err) = view.complete_qr(job.run()) {
        return Err(format!("{QR_FAILURE_NOTICE} ({err})"));
    }
    let selection = view
        .selected()
        .ok_or_else(|| QR_FAILURE_NOTICE.to_string())?;

    emit_info_line(&format!(
        "Transaksi {} untuk {} ({})",
        selection.transaction_id,
        selection.resident.name,
        format_rupiah(selection.resident.amount)
    ));
    if args.data_uri {
        println!("{}", selection.qr.data_uri());
    }

    let path = view
        .download(&args.output_dir)
        .map_err(|err| err.to_string())?;
    emit_info_line(&format!("QR output: {}", path.display()));

    if args.copy {
        let mut clipboard = StdoutClipboard;
        view.copy_payload(&mut clipboard)
            .map_err(|err| format!("{COPY_FAILURE_NOTICE} ({err})"))?;
        if view.copy_acknowledged(Instant::now()) {
            emit_info_line("Payload disalin");
        }
    }

    view.close();
    Ok(())
}

fn run_notifications(args: NotificationsArgs) -> Result<(), String> {
    let announcements = load_announcements(args.announcements.as_ref())?;
    let mut panel = NotificationPanel::new(announcements);
    panel.toggle();

    for id in &args.read {
        panel.mark_read(*id);
    }
    if args.read_all {
        panel.mark_all_read();
    }
    if args.reset {
        panel.reset();
    }

    let badge = panel.badge_label();
    if !badge.is_empty() {
        emit_info_line(&format!("Pengumuman [{badge}]"));
    }
    if let Some(summary) = panel.unread_summary() {
        emit_info_line(&summary);
    }

    if !panel.is_open() {
        return Ok(());
    }
    if panel.active_count() == 0 {
        emit_info_line("Tidak ada pengumuman aktif");
    } else if panel.unread_count() == 0 {
        emit_info_line("Semua pengumuman sudah dibaca");
    }

    for announcement in panel.active() {
        let status = if panel.is_read(announcement.id) {
            "dibaca"
        } else {
            "baru"
        };
        println!(
            "{} #{} {} ({}) [{}]",
            announcement.priority.marker(),
            announcement.id,
            announcement.title,
            announcement.created_at.format("%d/%m/%Y %H:%M"),
            status
        );
        println!("    {}", announcement.content);
    }

    if let Some(footer) = panel.footer() {
        emit_info_line(&footer);
    }
    panel.close();
    Ok(())
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        eprintln!("{message}");
    }
}
