//! Master list of Czech regions (kraje, NUTS 3) and districts (okresy,
//! LAU 1). A district code extends its region code by one character.

use std::collections::HashMap;

use lazy_static::lazy_static;


#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub struct Region {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub struct District {
    pub code: &'static str,
    pub name: &'static str,
}

impl District {

    pub fn region_code(&self) -> &'static str {
	region_of(self.code).unwrap_or(self.code)
    }

}


/// Region code of a district code, i.e. its first five characters.
pub fn region_of(district: &str) -> Option<&str> {
    match district.len() == 6 && district.is_ascii() {
	false => None,
	true => Some(&district[..5]),
    }
}


pub const REGIONS: &[Region] = &[
    Region { code: "CZ010", name: "Hlavní město Praha" },
    Region { code: "CZ020", name: "Středočeský kraj" },
    Region { code: "CZ031", name: "Jihočeský kraj" },
    Region { code: "CZ032", name: "Plzeňský kraj" },
    Region { code: "CZ041", name: "Karlovarský kraj" },
    Region { code: "CZ042", name: "Ústecký kraj" },
    Region { code: "CZ051", name: "Liberecký kraj" },
    Region { code: "CZ052", name: "Královéhradecký kraj" },
    Region { code: "CZ053", name: "Pardubický kraj" },
    Region { code: "CZ063", name: "Kraj Vysočina" },
    Region { code: "CZ064", name: "Jihomoravský kraj" },
    Region { code: "CZ071", name: "Olomoucký kraj" },
    Region { code: "CZ072", name: "Zlínský kraj" },
    Region { code: "CZ080", name: "Moravskoslezský kraj" },
];

pub const DISTRICTS: &[District] = &[
    District { code: "CZ0100", name: "Praha" },
    District { code: "CZ0201", name: "Benešov" },
    District { code: "CZ0202", name: "Beroun" },
    District { code: "CZ0203", name: "Kladno" },
    District { code: "CZ0204", name: "Kolín" },
    District { code: "CZ0205", name: "Kutná Hora" },
    District { code: "CZ0206", name: "Mělník" },
    District { code: "CZ0207", name: "Mladá Boleslav" },
    District { code: "CZ0208", name: "Nymburk" },
    District { code: "CZ0209", name: "Praha-východ" },
    District { code: "CZ020A", name: "Praha-západ" },
    District { code: "CZ020B", name: "Příbram" },
    District { code: "CZ020C", name: "Rakovník" },
    District { code: "CZ0311", name: "České Budějovice" },
    District { code: "CZ0312", name: "Český Krumlov" },
    District { code: "CZ0313", name: "Jindřichův Hradec" },
    District { code: "CZ0314", name: "Písek" },
    District { code: "CZ0315", name: "Prachatice" },
    District { code: "CZ0316", name: "Strakonice" },
    District { code: "CZ0317", name: "Tábor" },
    District { code: "CZ0321", name: "Domažlice" },
    District { code: "CZ0322", name: "Klatovy" },
    District { code: "CZ0323", name: "Plzeň-město" },
    District { code: "CZ0324", name: "Plzeň-jih" },
    District { code: "CZ0325", name: "Plzeň-sever" },
    District { code: "CZ0326", name: "Rokycany" },
    District { code: "CZ0327", name: "Tachov" },
    District { code: "CZ0411", name: "Cheb" },
    District { code: "CZ0412", name: "Karlovy Vary" },
    District { code: "CZ0413", name: "Sokolov" },
    District { code: "CZ0421", name: "Děčín" },
    District { code: "CZ0422", name: "Chomutov" },
    District { code: "CZ0423", name: "Litoměřice" },
    District { code: "CZ0424", name: "Louny" },
    District { code: "CZ0425", name: "Most" },
    District { code: "CZ0426", name: "Teplice" },
    District { code: "CZ0427", name: "Ústí nad Labem" },
    District { code: "CZ0511", name: "Česká Lípa" },
    District { code: "CZ0512", name: "Jablonec nad Nisou" },
    District { code: "CZ0513", name: "Liberec" },
    District { code: "CZ0514", name: "Semily" },
    District { code: "CZ0521", name: "Hradec Králové" },
    District { code: "CZ0522", name: "Jičín" },
    District { code: "CZ0523", name: "Náchod" },
    District { code: "CZ0524", name: "Rychnov nad Kněžnou" },
    District { code: "CZ0525", name: "Trutnov" },
    District { code: "CZ0531", name: "Chrudim" },
    District { code: "CZ0532", name: "Pardubice" },
    District { code: "CZ0533", name: "Svitavy" },
    District { code: "CZ0534", name: "Ústí nad Orlicí" },
    District { code: "CZ0631", name: "Havlíčkův Brod" },
    District { code: "CZ0632", name: "Jihlava" },
    District { code: "CZ0633", name: "Pelhřimov" },
    District { code: "CZ0634", name: "Třebíč" },
    District { code: "CZ0635", name: "Žďár nad Sázavou" },
    District { code: "CZ0641", name: "Blansko" },
    District { code: "CZ0642", name: "Brno-město" },
    District { code: "CZ0643", name: "Brno-venkov" },
    District { code: "CZ0644", name: "Břeclav" },
    District { code: "CZ0645", name: "Hodonín" },
    District { code: "CZ0646", name: "Vyškov" },
    District { code: "CZ0647", name: "Znojmo" },
    District { code: "CZ0711", name: "Jeseník" },
    District { code: "CZ0712", name: "Olomouc" },
    District { code: "CZ0713", name: "Prostějov" },
    District { code: "CZ0714", name: "Přerov" },
    District { code: "CZ0715", name: "Šumperk" },
    District { code: "CZ0721", name: "Kroměříž" },
    District { code: "CZ0722", name: "Uherské Hradiště" },
    District { code: "CZ0723", name: "Vsetín" },
    District { code: "CZ0724", name: "Zlín" },
    District { code: "CZ0801", name: "Bruntál" },
    District { code: "CZ0802", name: "Frýdek-Místek" },
    District { code: "CZ0803", name: "Karviná" },
    District { code: "CZ0804", name: "Nový Jičín" },
    District { code: "CZ0805", name: "Opava" },
    District { code: "CZ0806", name: "Ostrava-město" },
];


lazy_static! {
    static ref REGIONS_BY_ID: HashMap<&'static str,&'static Region> =
	REGIONS.iter().map(|r| (r.code, r)).collect();
    static ref DISTRICTS_BY_ID: HashMap<&'static str,&'static District> =
	DISTRICTS.iter().map(|d| (d.code, d)).collect();
    static ref REGIONS_BY_NAME: Vec<&'static Region> = {
	let mut all: Vec<_> = REGIONS.iter().collect();
	all.sort_by(|a,b| a.name.cmp(b.name));
	all
    };
    static ref DISTRICTS_BY_NAME: Vec<&'static District> = {
	let mut all: Vec<_> = DISTRICTS.iter().collect();
	all.sort_by(|a,b| a.name.cmp(b.name));
	all
    };
}


pub fn region_by_id(code: &str) -> Option<&'static Region> {
    REGIONS_BY_ID.get(code).copied()
}

pub fn district_by_id(code: &str) -> Option<&'static District> {
    DISTRICTS_BY_ID.get(code).copied()
}

/// Regions sorted by name, for area pickers.
pub fn regions_by_name() -> &'static [&'static Region] {
    &REGIONS_BY_NAME
}

pub fn districts_by_name() -> &'static [&'static District] {
    &DISTRICTS_BY_NAME
}

pub fn districts_of(region: &str) -> impl Iterator<Item = &'static District> + '_ {
    DISTRICTS.iter().filter(move |d| d.region_code() == region)
}
