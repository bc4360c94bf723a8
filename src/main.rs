use std::path::{Path,PathBuf};
use std::sync::Arc;

use chrono::{Duration,Local};
use chrono::naive::NaiveDate;
use log::{error,info,warn};
use unidecode::unidecode;

use covid19_dashboard::config::Config;
use covid19_dashboard::dashboard::{Dashboard,Timeline};
use covid19_dashboard::geo;
use covid19_dashboard::graph;
use covid19_dashboard::mzcr::HttpSource;
use covid19_dashboard::state::{Selection,SelectionStore,ViewMode,persistence};
use covid19_dashboard::stats::{self,Selectors};
use covid19_dashboard::storage::FileStorage;
use covid19_dashboard::Result;


fn main() -> Result<()> {

    pretty_env_logger::init();

    let config = Config::load(Path::new("dashboard.toml"))?;
    let today = Local::now().date_naive();

    let storage = FileStorage::open(&config.settings_path);
    let mut store = SelectionStore::new(Selection::restore(&storage, today));
    store.subscribe(persistence(storage));

    let source = HttpSource::new(&config.base_url, &config.cache_path, config.cache_max_age());
    let dashboard = Dashboard::new(geo::DISTRICTS, config.start_date);

    let timeline = match dashboard.refresh(&source, today) {
	Ok(timeline) => timeline,
	Err(err) => {
	    error!("No data: {}", err);
	    return Err(err);
	}
    };

    let report = &timeline.report;
    if !report.unresolved_districts.is_empty() {
	warn!("Districts without region: {:?}", report.unresolved_districts);
    }

    let graph_path = &config.graph_path;
    let mut selectors = Selectors::new();

    if let Err(err) = selection_outputs(graph_path, &timeline, &mut selectors, store.state()) {
	error!("Error: selection outputs: {}", err);
    }

    if let Err(err) = region_graphs(graph_path, &timeline, &mut selectors, store.state()) {
	error!("Error: region graphs: {}", err);
    }

    if let Err(err) = country_graph(graph_path, &timeline, store.state()) {
	error!("Error: country graph: {}", err);
    }

    Ok(())

}


fn area_name(view_mode: ViewMode, code: &str) -> String {
    let name = match view_mode {
	ViewMode::Region => geo::region_by_id(code).map(|r| r.name),
	ViewMode::District => geo::district_by_id(code).map(|d| d.name),
    };
    name.unwrap_or(code).to_string()
}


fn file_name(view_mode: ViewMode, name: &str) -> String {
    format!("{}-{}", view_mode, unidecode(name).to_lowercase().replace(' ', "-"))
}


fn selection_outputs(graph_path: &Path, timeline: &Arc<Timeline>, selectors: &mut Selectors,
		     selection: &Selection) -> Result<()> {

    let map = selectors.map_data(timeline, selection);
    let max_active_count = selectors.max_active_count(timeline, selection.view_mode);
    info!("Map for {}: {} areas, max active {}", selection.needle, map.len(), max_active_count);
    graph::map_snapshot(graph_path, &format!("map-{}", selection.view_mode),
			selection.needle, max_active_count, &map)?;

    let name = area_name(selection.view_mode, selection.selected_area());
    let trend = selectors.graph_data(timeline, selection);
    graph::trend_graph(graph_path, "selected",
		       &format!("{} (last {} days)", name, selection.window_days),
		       selection.needle, &trend)

}


fn region_graphs(graph_path: &Path, timeline: &Arc<Timeline>, selectors: &mut Selectors,
		 selection: &Selection) -> Result<()> {

    let graph_path: PathBuf = graph_path.join("regions");
    let data = selectors.data_with_view(timeline, ViewMode::Region);

    for region in geo::regions_by_name() {
	let trend = stats::slice_for_graph(&data, ViewMode::Region, region.code,
					   selection.window_days, timeline.end);
	let trend: Vec<_> = trend.into_iter().cloned().collect();
	graph::trend_graph(&graph_path, &file_name(ViewMode::Region, region.name),
			   region.name, selection.needle, &trend)?;
    }

    Ok(())

}


fn country_graph(graph_path: &Path, timeline: &Timeline, selection: &Selection) -> Result<()> {
    let from = timeline.end.checked_sub_signed(Duration::days(selection.window_days.into()))
	.unwrap_or(NaiveDate::MIN);
    let data: Vec<_> = stats::with_active_count(stats::group_by_country(&timeline.records))
	.into_iter().filter(|r| r.date() >= from).collect();
    graph::trend_graph(graph_path, "country", "Česká republika", selection.needle, &data)
}
